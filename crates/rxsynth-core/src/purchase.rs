//! Purchase history stage.
//!
//! Drugs are drawn from a weighted table built per user: every catalog entry
//! has weight 1, and each `ConditionBias` whose condition the user has adds
//! its `extra_weight` to every entry of the mapped category. Unrelated drugs
//! stay possible; condition-relevant ones just become more likely.

use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDateTime};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::debug;

use rxsynth_contracts::{
    error::{SynthError, SynthResult},
    ids::UserId,
    record::{MedicalProfile, Purchase},
};

use crate::catalog::{Catalog, CatalogEntry};
use crate::traits::IdentityFabricator;

/// Number of purchases per user.
pub const PURCHASES_PER_USER: RangeInclusive<usize> = 3..=15;

/// Units bought per purchase.
pub const QUANTITY: RangeInclusive<u8> = 1..=3;

/// How far back purchase timestamps reach (two years).
pub const HISTORY_WINDOW_DAYS: i64 = 730;

/// Base draw weight of every catalog entry.
pub const BASE_WEIGHT: u32 = 1;

/// Weighted drug table for one user.
#[derive(Debug)]
pub struct DrugPool<'c> {
    entries: Vec<&'c CatalogEntry>,
    weights: Vec<u32>,
    index: WeightedIndex<u32>,
}

impl<'c> DrugPool<'c> {
    /// Build the table for a user with the given medical profile.
    pub fn for_profile(catalog: &'c Catalog, medical: &MedicalProfile) -> SynthResult<Self> {
        let mut entries = Vec::new();
        let mut weights = Vec::new();

        for category in catalog.categories() {
            let weight = catalog
                .condition_bias()
                .iter()
                .filter(|b| b.category == category.name && medical.has_condition(&b.condition))
                .try_fold(BASE_WEIGHT, |acc, b| acc.checked_add(b.extra_weight))
                .ok_or_else(|| SynthError::InternalConsistency {
                    reason: format!("draw weight of category '{}' overflows", category.name),
                })?;

            for drug in &category.drugs {
                entries.push(drug);
                weights.push(weight);
            }
        }

        weights
            .iter()
            .try_fold(0u32, |acc, w| acc.checked_add(*w))
            .ok_or_else(|| SynthError::InternalConsistency {
                reason: "total drug draw weight overflows".to_string(),
            })?;

        let index =
            WeightedIndex::new(weights.iter().copied()).map_err(|e| SynthError::InternalConsistency {
                reason: format!("cannot build drug pool: {}", e),
            })?;

        Ok(Self {
            entries,
            weights,
            index,
        })
    }

    /// Draw weight of `drug_name`, or `None` if it is not in the catalog.
    pub fn weight_of(&self, drug_name: &str) -> Option<u32> {
        self.entries
            .iter()
            .position(|e| e.name == drug_name)
            .map(|i| self.weights[i])
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &'c CatalogEntry {
        self.entries[self.index.sample(rng)]
    }
}

/// Generate a user's purchase history, most recent first.
///
/// Order IDs follow generation order, so after the final sort they are no
/// longer monotonic.
pub fn generate_purchase_history<F, R>(
    user_id: &UserId,
    medical: &MedicalProfile,
    catalog: &Catalog,
    fabricator: &F,
    now: NaiveDateTime,
    rng: &mut R,
) -> SynthResult<Vec<Purchase>>
where
    F: IdentityFabricator,
    R: Rng + ?Sized,
{
    let pool = DrugPool::for_profile(catalog, medical)?;
    let count = rng.gen_range(PURCHASES_PER_USER);
    let window_secs = HISTORY_WINDOW_DAYS * 24 * 60 * 60;

    let mut purchases: Vec<Purchase> = (1..=count)
        .map(|seq| {
            let drug = pool.draw(rng);
            let purchase_date = now - Duration::seconds(rng.gen_range(0..=window_secs));
            Purchase {
                order_id: user_id.order_id(seq),
                drug_name: drug.name.clone(),
                is_prescription: drug.is_prescription(),
                quantity: rng.gen_range(QUANTITY),
                purchase_date,
                pharmacy: format!("{} Pharmacy", fabricator.company(rng)),
            }
        })
        .collect();

    purchases.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));

    debug!(
        user_id = %user_id,
        purchases = purchases.len(),
        rx = purchases.iter().filter(|p| p.is_prescription).count(),
        "purchase history generated"
    );

    Ok(purchases)
}
