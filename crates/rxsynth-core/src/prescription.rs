//! Prescription stage, derived from a finalized purchase history.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDateTime};
use rand::Rng;

use rxsynth_contracts::{
    ids::UserId,
    record::{Prescription, Purchase},
};

use crate::traits::IdentityFabricator;

/// Days between issuing a prescription and the purchase it authorizes.
pub const ISSUE_LEAD_DAYS: RangeInclusive<i64> = 2..=5;

pub const REFILLS_REMAINING: RangeInclusive<u8> = 0..=5;

/// One prescription per distinct Rx drug in `history`.
///
/// Each prescription is dated a few days before the latest purchase of its
/// drug. Drugs are visited in name order so seeded runs are reproducible.
/// A history without Rx purchases yields an empty list.
pub fn generate_prescriptions<F, R>(
    user_id: &UserId,
    history: &[Purchase],
    fabricator: &F,
    rng: &mut R,
) -> Vec<Prescription>
where
    F: IdentityFabricator,
    R: Rng + ?Sized,
{
    latest_rx_purchases(history)
        .into_iter()
        .enumerate()
        .map(|(i, (drug_name, bought))| {
            let lead = Duration::days(rng.gen_range(ISSUE_LEAD_DAYS));
            Prescription {
                prescription_id: user_id.prescription_id(i + 1),
                drug_name: drug_name.to_string(),
                doctor_name: format!("Dr. {}", fabricator.last_name(rng)),
                issue_date: (bought - lead).date(),
                dosage: dosage_of(drug_name).to_string(),
                refills_remaining: rng.gen_range(REFILLS_REMAINING),
                is_auto_refill_enabled: rng.gen_bool(0.5),
            }
        })
        .collect()
}

/// Latest purchase timestamp of every distinct Rx drug.
pub fn latest_rx_purchases(history: &[Purchase]) -> BTreeMap<&str, NaiveDateTime> {
    let mut latest: BTreeMap<&str, NaiveDateTime> = BTreeMap::new();
    for purchase in history.iter().filter(|p| p.is_prescription) {
        latest
            .entry(purchase.drug_name.as_str())
            .and_modify(|d| *d = (*d).max(purchase.purchase_date))
            .or_insert(purchase.purchase_date);
    }
    latest
}

/// The last space-separated token of a drug name ("500mg" in "Metformin 500mg").
pub fn dosage_of(drug_name: &str) -> &str {
    drug_name
        .rsplit_once(' ')
        .map(|(_, dose)| dose)
        .unwrap_or(drug_name)
}
