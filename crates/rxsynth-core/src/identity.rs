//! Identity stage: user ID plus fabricated personal details.

use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

use rxsynth_contracts::{ids::UserId, record::Identity};

use crate::traits::IdentityFabricator;

/// Gender codes used when the fabricator does not supply one.
pub const FALLBACK_GENDERS: [&str; 2] = ["M", "F"];

/// Ages, in years, that birthdates are drawn from.
pub const AGE_YEARS: RangeInclusive<i64> = 18..=90;

/// Build the identity for the 1-based population index `index`.
///
/// Never fails. Multi-line addresses are flattened with `", "`.
pub fn generate_identity<F, R>(
    index: u32,
    fabricator: &F,
    today: NaiveDate,
    rng: &mut R,
) -> Identity
where
    F: IdentityFabricator,
    R: Rng + ?Sized,
{
    let name = fabricator.full_name(rng);
    let gender = match fabricator.gender(rng) {
        Some(g) if !g.trim().is_empty() => g,
        _ => FALLBACK_GENDERS
            .choose(rng)
            .copied()
            .unwrap_or(FALLBACK_GENDERS[0])
            .to_string(),
    };
    let date_of_birth = birthdate(today, rng);
    let address = flatten_address(&fabricator.address(rng));
    let email = fabricator.email(rng);
    let phone_number = fabricator.phone_number(rng);

    Identity {
        user_id: UserId::from_index(index),
        name,
        gender,
        date_of_birth,
        address,
        email,
        phone_number,
    }
}

/// A birthdate whose age on `today` falls within `AGE_YEARS`.
fn birthdate<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> NaiveDate {
    // 366/365-day years keep both ends inside the range regardless of leap days.
    let youngest = AGE_YEARS.start() * 366;
    let oldest = (AGE_YEARS.end() + 1) * 365 - 1;
    today - Duration::days(rng.gen_range(youngest..=oldest))
}

fn flatten_address(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
