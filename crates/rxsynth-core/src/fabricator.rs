//! `fake`-backed fabricator using the English locale.

use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::traits::IdentityFabricator;

const GENDER_CODES: [&str; 2] = ["M", "F"];

/// Default fabricator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeFabricator;

impl IdentityFabricator for FakeFabricator {
    fn full_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        Name().fake_with_rng(rng)
    }

    fn gender<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        GENDER_CODES.choose(rng).map(|g| g.to_string())
    }

    fn address<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let building: String = BuildingNumber().fake_with_rng(rng);
        let street: String = StreetName().fake_with_rng(rng);
        let city: String = CityName().fake_with_rng(rng);
        let state: String = StateAbbr().fake_with_rng(rng);
        let zip: String = ZipCode().fake_with_rng(rng);
        format!("{building} {street}\n{city}, {state} {zip}")
    }

    fn email<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        SafeEmail().fake_with_rng(rng)
    }

    fn phone_number<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        PhoneNumber().fake_with_rng(rng)
    }

    fn company<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        CompanyName().fake_with_rng(rng)
    }

    fn last_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        LastName().fake_with_rng(rng)
    }
}
