//! Semantic dataset rules.
//!
//! Each rule inspects one typed `UserRecord` and returns a message per
//! violation. Uniqueness of `user_id` spans the whole dataset and is checked
//! by the engine under `unique-ids`.

use std::collections::{BTreeMap, HashSet};
use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDateTime, NaiveTime};

use rxsynth_contracts::record::{UserRecord, NONE_LABEL};
use rxsynth_core::{
    prescription::{dosage_of, REFILLS_REMAINING},
    purchase::{HISTORY_WINDOW_DAYS, QUANTITY},
    Catalog,
};

/// Allowed purchase-history length.
pub const PURCHASE_COUNT: RangeInclusive<usize> = 3..=15;

/// The semantic checks `DatasetVerifier` knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetRule {
    /// `"None"` only ever appears alone; label lists are never empty.
    NoneExclusive,
    /// Purchase history length is within `PURCHASE_COUNT`.
    PurchaseCount,
    /// Purchases are sorted newest first.
    PurchaseOrder,
    /// Prescriptions cover exactly the distinct Rx drugs purchased.
    RxDerived,
    /// Each prescription is issued before its latest matching purchase.
    RxIssueBeforePurchase,
    /// No drug has more than one prescription.
    RxUniqueDrug,
    /// IDs are unique: user IDs across the dataset, order and prescription
    /// IDs within their user.
    UniqueIds,
    /// Purchased drugs exist in the catalog with a matching Rx flag.
    /// Skipped when the verifier has no catalog.
    CatalogMembership,
    /// Quantities, refill counts and dosages are in range, and purchases
    /// fit the two-year history window (ending at the run time, if known).
    ValueRanges,
}

/// What rules may consult besides the record itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleContext<'a> {
    /// Catalog for membership checks.
    pub catalog: Option<&'a Catalog>,
    /// The generation run's "now"; purchases must not be later.
    pub as_of: Option<NaiveDateTime>,
}

impl DatasetRule {
    pub const ALL: [DatasetRule; 9] = [
        DatasetRule::NoneExclusive,
        DatasetRule::PurchaseCount,
        DatasetRule::PurchaseOrder,
        DatasetRule::RxDerived,
        DatasetRule::RxIssueBeforePurchase,
        DatasetRule::RxUniqueDrug,
        DatasetRule::UniqueIds,
        DatasetRule::CatalogMembership,
        DatasetRule::ValueRanges,
    ];

    pub fn rule_id(self) -> &'static str {
        match self {
            DatasetRule::NoneExclusive => "none-exclusive",
            DatasetRule::PurchaseCount => "purchase-count",
            DatasetRule::PurchaseOrder => "purchase-order",
            DatasetRule::RxDerived => "rx-derived",
            DatasetRule::RxIssueBeforePurchase => "rx-issue-before-purchase",
            DatasetRule::RxUniqueDrug => "rx-unique-drug",
            DatasetRule::UniqueIds => "unique-ids",
            DatasetRule::CatalogMembership => "catalog-membership",
            DatasetRule::ValueRanges => "value-ranges",
        }
    }

    /// Evaluate this rule against one user.
    pub fn check(self, user: &UserRecord, ctx: &RuleContext<'_>) -> Vec<String> {
        match self {
            DatasetRule::NoneExclusive => none_exclusive(user),
            DatasetRule::PurchaseCount => {
                let n = user.purchase_history.len();
                if PURCHASE_COUNT.contains(&n) {
                    Vec::new()
                } else {
                    vec![format!(
                        "{} purchases, expected {}..={}",
                        n,
                        PURCHASE_COUNT.start(),
                        PURCHASE_COUNT.end()
                    )]
                }
            }
            DatasetRule::PurchaseOrder => user
                .purchase_history
                .windows(2)
                .filter(|w| w[0].purchase_date < w[1].purchase_date)
                .map(|w| {
                    format!(
                        "{} ({}) precedes newer {} ({})",
                        w[0].order_id, w[0].purchase_date, w[1].order_id, w[1].purchase_date
                    )
                })
                .collect(),
            DatasetRule::RxDerived => rx_derived(user),
            DatasetRule::RxIssueBeforePurchase => rx_issue_before_purchase(user),
            DatasetRule::RxUniqueDrug => {
                let mut seen = HashSet::new();
                user.prescriptions
                    .iter()
                    .filter(|p| !seen.insert(p.drug_name.as_str()))
                    .map(|p| format!("duplicate prescription for '{}'", p.drug_name))
                    .collect()
            }
            DatasetRule::UniqueIds => {
                let mut messages = duplicates(user.purchase_history.iter().map(|p| p.order_id.as_str()));
                messages.extend(duplicates(
                    user.prescriptions.iter().map(|p| p.prescription_id.as_str()),
                ));
                messages
            }
            DatasetRule::CatalogMembership => match ctx.catalog {
                Some(catalog) => catalog_membership(user, catalog),
                None => Vec::new(),
            },
            DatasetRule::ValueRanges => value_ranges(user, ctx.as_of),
        }
    }
}

fn none_exclusive(user: &UserRecord) -> Vec<String> {
    [
        ("allergies", &user.allergies),
        ("chronic_conditions", &user.chronic_conditions),
    ]
    .into_iter()
    .filter_map(|(field, labels)| {
        if labels.is_empty() {
            Some(format!("{field} is empty"))
        } else if labels.len() > 1 && labels.iter().any(|l| l == NONE_LABEL) {
            Some(format!("{field} mixes \"{NONE_LABEL}\" with other labels: {labels:?}"))
        } else {
            None
        }
    })
    .collect()
}

/// Latest purchase of every distinct Rx drug.
fn latest_rx(user: &UserRecord) -> BTreeMap<&str, NaiveDateTime> {
    let mut latest: BTreeMap<&str, NaiveDateTime> = BTreeMap::new();
    for p in user.purchase_history.iter().filter(|p| p.is_prescription) {
        let entry = latest.entry(p.drug_name.as_str()).or_insert(p.purchase_date);
        *entry = (*entry).max(p.purchase_date);
    }
    latest
}

fn rx_derived(user: &UserRecord) -> Vec<String> {
    let bought = latest_rx(user);
    let prescribed: HashSet<&str> = user.prescriptions.iter().map(|p| p.drug_name.as_str()).collect();

    let mut messages: Vec<String> = user
        .prescriptions
        .iter()
        .filter(|p| !bought.contains_key(p.drug_name.as_str()))
        .map(|p| {
            format!(
                "{} prescribes '{}' which was never bought on prescription",
                p.prescription_id, p.drug_name
            )
        })
        .collect();
    messages.extend(
        bought
            .keys()
            .filter(|drug| !prescribed.contains(*drug))
            .map(|drug| format!("Rx purchase of '{drug}' has no prescription")),
    );
    messages
}

fn rx_issue_before_purchase(user: &UserRecord) -> Vec<String> {
    let bought = latest_rx(user);
    user.prescriptions
        .iter()
        .filter_map(|p| {
            let latest = bought.get(p.drug_name.as_str())?;
            let issued = p.issue_date.and_time(NaiveTime::MIN);
            (issued >= *latest).then(|| {
                format!(
                    "{} issued {} but latest purchase of '{}' was {}",
                    p.prescription_id, p.issue_date, p.drug_name, latest
                )
            })
        })
        .collect()
}

fn catalog_membership(user: &UserRecord, catalog: &Catalog) -> Vec<String> {
    let mut messages = Vec::new();
    for p in &user.purchase_history {
        match catalog.entry(&p.drug_name) {
            None => messages.push(format!("{} buys unknown drug '{}'", p.order_id, p.drug_name)),
            Some((_, entry)) if entry.is_prescription() != p.is_prescription => messages.push(
                format!("{} flags '{}' with the wrong prescription status", p.order_id, p.drug_name),
            ),
            Some(_) => {}
        }
    }
    for p in &user.prescriptions {
        if catalog.entry(&p.drug_name).is_none() {
            messages.push(format!("{} prescribes unknown drug '{}'", p.prescription_id, p.drug_name));
        }
    }
    messages
}

fn value_ranges(user: &UserRecord, as_of: Option<NaiveDateTime>) -> Vec<String> {
    let mut messages = Vec::new();
    let window = Duration::days(HISTORY_WINDOW_DAYS);

    for p in &user.purchase_history {
        if !QUANTITY.contains(&p.quantity) {
            messages.push(format!(
                "{} has quantity {}, expected {}..={}",
                p.order_id,
                p.quantity,
                QUANTITY.start(),
                QUANTITY.end()
            ));
        }
        if let Some(now) = as_of {
            if p.purchase_date > now || p.purchase_date < now - window {
                messages.push(format!(
                    "{} dated {} falls outside the {} days before {}",
                    p.order_id, p.purchase_date, HISTORY_WINDOW_DAYS, now
                ));
            }
        }
    }

    let dates = user.purchase_history.iter().map(|p| p.purchase_date);
    if let (Some(newest), Some(oldest)) = (dates.clone().max(), dates.min()) {
        if newest - oldest > window {
            messages.push(format!(
                "purchases span {} to {}, wider than {} days",
                oldest, newest, HISTORY_WINDOW_DAYS
            ));
        }
    }

    for p in &user.prescriptions {
        if !REFILLS_REMAINING.contains(&p.refills_remaining) {
            messages.push(format!(
                "{} has {} refills remaining, expected {}..={}",
                p.prescription_id,
                p.refills_remaining,
                REFILLS_REMAINING.start(),
                REFILLS_REMAINING.end()
            ));
        }
        let expected = dosage_of(&p.drug_name);
        if p.dosage != expected {
            messages.push(format!(
                "{} has dosage '{}' but '{}' implies '{}'",
                p.prescription_id, p.dosage, p.drug_name, expected
            ));
        }
    }
    messages
}

/// One message per ID that occurs more than once.
pub(crate) fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    ids.filter(|id| !seen.insert(*id) && reported.insert(*id))
        .map(|id| format!("duplicate id '{id}'"))
        .collect()
}
