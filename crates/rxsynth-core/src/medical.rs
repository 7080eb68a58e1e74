//! Medical profile stage: allergies and chronic conditions.

use rand::seq::SliceRandom;
use rand::Rng;

use rxsynth_contracts::record::{MedicalProfile, NONE_LABEL};

use crate::catalog::{Catalog, Vocabulary};

/// Draw an allergy list and a condition list independently.
pub fn generate_medical_profile<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> MedicalProfile {
    MedicalProfile {
        allergies: sample_labels(catalog.allergies(), rng),
        chronic_conditions: sample_labels(catalog.chronic_conditions(), rng),
    }
}

/// Sample `0..=max_sample` distinct labels, then normalize the `"None"`
/// sentinel so it never shares the list with a real label and the list is
/// never empty.
pub fn sample_labels<R: Rng + ?Sized>(vocabulary: &Vocabulary, rng: &mut R) -> Vec<String> {
    let k = rng.gen_range(0..=vocabulary.max_sample);
    let mut labels: Vec<String> = vocabulary
        .labels
        .choose_multiple(rng, k)
        .cloned()
        .collect();
    normalize_none(&mut labels);
    labels
}

/// Enforce `"None"` exclusivity in place.
pub fn normalize_none(labels: &mut Vec<String>) {
    if labels.len() > 1 {
        labels.retain(|l| l != NONE_LABEL);
    }
    if labels.is_empty() {
        labels.push(NONE_LABEL.to_string());
    }
}
