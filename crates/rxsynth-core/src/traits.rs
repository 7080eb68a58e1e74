//! The fabrication seam.
//!
//! Generation stages never produce personal details themselves; they ask an
//! `IdentityFabricator`. Every method takes the caller's random source so a
//! seeded run stays reproducible end to end.

use rand::Rng;

/// A source of plausible but fictitious personal and business details.
pub trait IdentityFabricator {
    /// A display name, e.g. "Jane Roe".
    fn full_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String;

    /// A gender code. `None` means the fabricator has no opinion and the
    /// identity stage picks a default.
    fn gender<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String>;

    /// A postal address. May span several lines.
    fn address<R: Rng + ?Sized>(&self, rng: &mut R) -> String;

    fn email<R: Rng + ?Sized>(&self, rng: &mut R) -> String;

    fn phone_number<R: Rng + ?Sized>(&self, rng: &mut R) -> String;

    /// A business name, used for pharmacies.
    fn company<R: Rng + ?Sized>(&self, rng: &mut R) -> String;

    /// A family name, used for prescribing doctors.
    fn last_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String;
}
