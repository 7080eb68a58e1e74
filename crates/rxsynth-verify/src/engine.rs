//! Dataset verifier.
//!
//! `DatasetVerifier` checks a dataset in two phases:
//!
//! 1. **Structural**: the raw JSON is validated against `dataset_schema()`
//!    using the `jsonschema` crate.
//! 2. **Semantic**: the JSON is decoded into `UserRecord`s and every enabled
//!    `DatasetRule` is evaluated per user, plus dataset-wide `user_id`
//!    uniqueness. All failures are collected before returning so operators
//!    see the full failure set in one pass.

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::{debug, warn};

use rxsynth_contracts::{
    error::{SynthError, SynthResult},
    record::UserRecord,
    verify::{VerificationFailure, VerificationReport},
};
use rxsynth_core::Catalog;

use crate::{
    rules::{duplicates, DatasetRule, RuleContext},
    schema::{dataset_schema, SCHEMA_RULE_ID},
};

/// Identifier reported when the JSON cannot be decoded into records.
pub const DECODE_RULE_ID: &str = "decode";

/// Verifies generated datasets against the schema and the semantic rules.
#[derive(Debug, Clone)]
pub struct DatasetVerifier {
    schema: Value,
    rules: Vec<DatasetRule>,
    catalog: Option<Catalog>,
    as_of: Option<NaiveDateTime>,
}

impl DatasetVerifier {
    /// A verifier running every rule, without catalog membership checks.
    pub fn new() -> Self {
        Self {
            schema: dataset_schema(),
            rules: DatasetRule::ALL.to_vec(),
            catalog: None,
            as_of: None,
        }
    }

    /// Also check purchased drugs against `catalog`.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Require purchases to fall in the history window ending at `now`.
    pub fn as_of(mut self, now: NaiveDateTime) -> Self {
        self.as_of = Some(now);
        self
    }

    /// Restrict the semantic phase to `rules`.
    pub fn with_rules(mut self, rules: &[DatasetRule]) -> Self {
        self.rules = rules.to_vec();
        self
    }

    /// Run both phases on raw dataset JSON.
    ///
    /// Returns `SynthError::SchemaValidation` only if the schema document
    /// itself cannot be compiled; dataset problems are reported as failures.
    pub fn verify_value(&self, dataset: &Value) -> SynthResult<VerificationReport> {
        let validator =
            jsonschema::validator_for(&self.schema).map_err(|e| SynthError::SchemaValidation {
                reason: format!("invalid dataset schema: {e}"),
            })?;

        let mut failures: Vec<VerificationFailure> = Vec::new();
        for error in validator.iter_errors(dataset) {
            let message = format!("JSON Schema violation at {}: {}", error.instance_path, error);
            warn!(%message, "structural validation failure");
            failures.push(VerificationFailure {
                rule_id: SCHEMA_RULE_ID.to_string(),
                user_id: None,
                message,
            });
        }

        match serde_json::from_value::<Vec<UserRecord>>(dataset.clone()) {
            Ok(users) => {
                let semantic = self.verify_records(&users);
                failures.extend(semantic.failures);
                Ok(finish(users.len(), failures))
            }
            Err(e) => {
                let message = format!("dataset does not decode into user records: {e}");
                warn!(%message, "decode failure");
                failures.push(VerificationFailure {
                    rule_id: DECODE_RULE_ID.to_string(),
                    user_id: None,
                    message,
                });
                Ok(finish(0, failures))
            }
        }
    }

    /// Run the semantic phase on typed records.
    pub fn verify_records(&self, users: &[UserRecord]) -> VerificationReport {
        let mut failures: Vec<VerificationFailure> = Vec::new();
        let ctx = RuleContext {
            catalog: self.catalog.as_ref(),
            as_of: self.as_of,
        };

        for user in users {
            for rule in &self.rules {
                for message in rule.check(user, &ctx) {
                    warn!(
                        rule_id = rule.rule_id(),
                        user_id = %user.user_id,
                        %message,
                        "semantic rule failed"
                    );
                    failures.push(VerificationFailure {
                        rule_id: rule.rule_id().to_string(),
                        user_id: Some(user.user_id.to_string()),
                        message,
                    });
                }
            }
        }

        if self.rules.contains(&DatasetRule::UniqueIds) {
            for message in duplicates(users.iter().map(|u| u.user_id.as_str())) {
                warn!(%message, "duplicate user id");
                failures.push(VerificationFailure {
                    rule_id: DatasetRule::UniqueIds.rule_id().to_string(),
                    user_id: None,
                    message,
                });
            }
        }

        finish(users.len(), failures)
    }
}

impl Default for DatasetVerifier {
    fn default() -> Self {
        Self::new()
    }
}

fn finish(users_checked: usize, failures: Vec<VerificationFailure>) -> VerificationReport {
    let passed = failures.is_empty();
    debug!(
        users_checked,
        passed,
        failure_count = failures.len(),
        "verification complete"
    );
    VerificationReport {
        passed,
        users_checked,
        failures,
    }
}
