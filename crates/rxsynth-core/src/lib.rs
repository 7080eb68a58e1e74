//! # rxsynth-core
//!
//! Synthetic pharmacy-customer generator.
//!
//! This crate provides:
//! - `Catalog`, the TOML-configurable drug catalog and medical vocabularies
//! - the `IdentityFabricator` seam and its `fake`-backed default
//! - the four generation stages (identity, medical, purchase, prescription)
//! - `DatasetGenerator`, which composes the stages into whole user records
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rxsynth_core::{run_rng, Catalog, DatasetGenerator};
//!
//! let generator = DatasetGenerator::new(Catalog::builtin());
//! let mut rng = run_rng(Some(7));
//! let users = generator.generate(100, &mut rng)?;
//! ```
//!
//! Every stage takes the random source as an explicit `&mut impl Rng`, so a
//! seeded `ChaCha8Rng` reproduces a dataset exactly for a pinned "now".

pub mod catalog;
pub mod fabricator;
pub mod generator;
pub mod identity;
pub mod medical;
pub mod prescription;
pub mod purchase;
pub mod traits;

pub use catalog::{Catalog, CatalogEntry, Dispensing};
pub use fabricator::FakeFabricator;
pub use generator::{run_rng, DatasetGenerator, DEFAULT_POPULATION};
pub use traits::IdentityFabricator;

// ── Tests ─────────────────────────────────────────────────────────────────────
