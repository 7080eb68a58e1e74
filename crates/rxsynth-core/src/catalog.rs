//! Drug catalog and medical vocabularies.
//!
//! A `Catalog` is deserialized from TOML and validated once on load. After
//! that it is immutable and shared read-only by every generation stage.
//!
//! Example:
//! ```toml
//! [allergies]
//! max_sample = 3
//! labels = ["Penicillin", "Latex", "None"]
//!
//! [chronic_conditions]
//! max_sample = 2
//! labels = ["Type 2 Diabetes", "Asthma", "None"]
//!
//! [[categories]]
//! name = "Diabetes"
//! drugs = [{ name = "Metformin 500mg", dispensing = "Rx" }]
//!
//! [[condition_bias]]
//! condition = "Type 2 Diabetes"
//! category = "Diabetes"
//! extra_weight = 3
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rxsynth_contracts::error::{SynthError, SynthResult};

/// The catalog shipped with the crate.
const DEFAULT_CATALOG: &str = include_str!("../catalog/default.toml");

/// Extra draw weight given to a condition-relevant category when a bias rule
/// omits `extra_weight`. Every catalog entry starts at weight 1.
pub const DEFAULT_CONDITION_BIAS_WEIGHT: u32 = 3;

/// Largest `extra_weight` a catalog may declare.
pub const MAX_CONDITION_BIAS_WEIGHT: u32 = 1_000;

/// How a drug may be dispensed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dispensing {
    /// Over the counter.
    #[serde(rename = "OTC")]
    Otc,
    /// Prescription only.
    #[serde(rename = "Rx")]
    Rx,
}

/// One purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub dispensing: Dispensing,
}

impl CatalogEntry {
    pub fn is_prescription(&self) -> bool {
        self.dispensing == Dispensing::Rx
    }
}

/// A therapeutic category and its products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugCategory {
    pub name: String,
    pub drugs: Vec<CatalogEntry>,
}

/// A label vocabulary plus the largest subset drawn from it per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    pub labels: Vec<String>,
    pub max_sample: usize,
}

/// Raises the draw weight of every drug in `category` for users that have
/// `condition` among their chronic conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionBias {
    pub condition: String,
    pub category: String,
    #[serde(default = "default_extra_weight")]
    pub extra_weight: u32,
}

fn default_extra_weight() -> u32 {
    DEFAULT_CONDITION_BIAS_WEIGHT
}

/// Static reference data for the generator.
///
/// Only constructible through the validating loaders, so every stage can
/// rely on non-empty categories, unique drug names and sample sizes that fit
/// their vocabularies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    allergies: Vocabulary,
    chronic_conditions: Vocabulary,
    categories: Vec<DrugCategory>,
    #[serde(default)]
    condition_bias: Vec<ConditionBias>,
}

impl Catalog {
    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `SynthError::ConfigError` for malformed documents and
    /// structural problems, and `SynthError::InternalConsistency` when a
    /// vocabulary cannot supply its configured sample size.
    pub fn from_toml_str(s: &str) -> SynthResult<Self> {
        let catalog: Catalog = toml::from_str(s).map_err(|e| SynthError::ConfigError {
            reason: format!("failed to parse catalog TOML: {}", e),
        })?;
        catalog.validate()?;
        debug!(
            categories = catalog.categories.len(),
            drugs = catalog.entries().count(),
            bias_rules = catalog.condition_bias.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Read the file at `path` and parse it as a catalog.
    pub fn from_file(path: &Path) -> SynthResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SynthError::ConfigError {
            reason: format!("failed to read catalog file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The embedded default catalog.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is invalid, which the crate's tests rule out.
    pub fn builtin() -> Self {
        Self::from_toml_str(DEFAULT_CATALOG).expect("embedded default catalog must be valid")
    }

    pub fn allergies(&self) -> &Vocabulary {
        &self.allergies
    }

    pub fn chronic_conditions(&self) -> &Vocabulary {
        &self.chronic_conditions
    }

    pub fn categories(&self) -> &[DrugCategory] {
        &self.categories
    }

    pub fn condition_bias(&self) -> &[ConditionBias] {
        &self.condition_bias
    }

    pub fn category(&self, name: &str) -> Option<&DrugCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Every entry in declaration order, paired with its category name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.categories
            .iter()
            .flat_map(|c| c.drugs.iter().map(move |d| (c.name.as_str(), d)))
    }

    /// Look up an entry by drug name.
    pub fn entry(&self, drug_name: &str) -> Option<(&str, &CatalogEntry)> {
        self.entries().find(|(_, e)| e.name == drug_name)
    }

    fn validate(&self) -> SynthResult<()> {
        check_vocabulary("allergies", &self.allergies)?;
        check_vocabulary("chronic_conditions", &self.chronic_conditions)?;

        if self.categories.is_empty() {
            return Err(config_error("catalog must declare at least one category"));
        }

        let mut category_names = HashSet::new();
        let mut drug_names = HashSet::new();
        for category in &self.categories {
            if !category_names.insert(category.name.as_str()) {
                return Err(config_error(format!("duplicate category '{}'", category.name)));
            }
            if category.drugs.is_empty() {
                return Err(config_error(format!("category '{}' has no drugs", category.name)));
            }
            for drug in &category.drugs {
                if drug.name.trim().is_empty() {
                    return Err(config_error(format!(
                        "category '{}' contains a drug with an empty name",
                        category.name
                    )));
                }
                if !drug_names.insert(drug.name.as_str()) {
                    return Err(config_error(format!("duplicate drug '{}'", drug.name)));
                }
            }
        }

        for bias in &self.condition_bias {
            if !category_names.contains(bias.category.as_str()) {
                return Err(config_error(format!(
                    "condition bias for '{}' refers to unknown category '{}'",
                    bias.condition, bias.category
                )));
            }
            if bias.extra_weight > MAX_CONDITION_BIAS_WEIGHT {
                return Err(config_error(format!(
                    "condition bias for '{}' has extra_weight {}, the maximum is {}",
                    bias.condition, bias.extra_weight, MAX_CONDITION_BIAS_WEIGHT
                )));
            }
        }

        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_vocabulary(field: &str, vocabulary: &Vocabulary) -> SynthResult<()> {
    if vocabulary.max_sample > vocabulary.labels.len() {
        return Err(SynthError::InternalConsistency {
            reason: format!(
                "{} samples up to {} labels but the vocabulary only has {}",
                field,
                vocabulary.max_sample,
                vocabulary.labels.len()
            ),
        });
    }

    let mut seen = HashSet::new();
    for label in &vocabulary.labels {
        if !seen.insert(label.as_str()) {
            return Err(config_error(format!("duplicate {} label '{}'", field, label)));
        }
    }
    Ok(())
}

fn config_error(reason: impl Into<String>) -> SynthError {
    SynthError::ConfigError {
        reason: reason.into(),
    }
}
