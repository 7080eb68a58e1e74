//! The dataset assembler.
//!
//! Every user is built by the same four stages, in order:
//!
//!   identity → medical profile → purchase history → prescriptions
//!
//! Prescriptions are derived only after the purchase history is complete and
//! sorted. Users share nothing but the read-only catalog and the random
//! source passed in by the caller.

use chrono::{NaiveDateTime, Timelike, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use rxsynth_contracts::{error::SynthResult, record::UserRecord};

use crate::{
    catalog::Catalog,
    fabricator::FakeFabricator,
    identity::generate_identity,
    medical::generate_medical_profile,
    prescription::generate_prescriptions,
    purchase::generate_purchase_history,
    traits::IdentityFabricator,
};

/// Population size used when the operator does not choose one.
pub const DEFAULT_POPULATION: u32 = 100;

/// Random source for a run: seeded when `seed` is given, otherwise from OS
/// entropy.
pub fn run_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Builds synthetic users from a catalog and a fabricator.
///
/// "Now" is captured once at construction (whole seconds, UTC) so every user
/// in a run shares the same purchase window.
#[derive(Debug, Clone)]
pub struct DatasetGenerator<F = FakeFabricator> {
    catalog: Catalog,
    fabricator: F,
    now: NaiveDateTime,
}

impl DatasetGenerator<FakeFabricator> {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_fabricator(catalog, FakeFabricator)
    }
}

impl<F: IdentityFabricator> DatasetGenerator<F> {
    pub fn with_fabricator(catalog: Catalog, fabricator: F) -> Self {
        let now = Utc::now().naive_utc();
        let now = now.with_nanosecond(0).unwrap_or(now);
        Self {
            catalog,
            fabricator,
            now,
        }
    }

    /// Pin the generator's notion of "now".
    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Build the user with 1-based population index `index`.
    pub fn generate_user<R: Rng + ?Sized>(&self, index: u32, rng: &mut R) -> SynthResult<UserRecord> {
        let identity = generate_identity(index, &self.fabricator, self.now.date(), rng);
        let medical = generate_medical_profile(&self.catalog, rng);
        let purchases = generate_purchase_history(
            &identity.user_id,
            &medical,
            &self.catalog,
            &self.fabricator,
            self.now,
            rng,
        )?;
        let prescriptions = generate_prescriptions(&identity.user_id, &purchases, &self.fabricator, rng);

        debug!(
            user_id = %identity.user_id,
            allergies = medical.allergies.len(),
            conditions = medical.chronic_conditions.len(),
            purchases = purchases.len(),
            prescriptions = prescriptions.len(),
            "user generated"
        );

        Ok(UserRecord::assemble(identity, medical, purchases, prescriptions))
    }

    /// Build users `1..=population`. A population of zero yields an empty list.
    pub fn generate<R: Rng + ?Sized>(&self, population: u32, rng: &mut R) -> SynthResult<Vec<UserRecord>> {
        info!(population, now = %self.now, "generating synthetic users");

        let users = (1..=population)
            .map(|index| self.generate_user(index, rng))
            .collect::<SynthResult<Vec<_>>>()?;

        info!(
            users = users.len(),
            purchases = users.iter().map(|u| u.purchase_history.len()).sum::<usize>(),
            prescriptions = users.iter().map(|u| u.prescriptions.len()).sum::<usize>(),
            "generation complete"
        );
        Ok(users)
    }
}
