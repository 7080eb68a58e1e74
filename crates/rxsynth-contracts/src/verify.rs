//! Dataset verification report types.
//!
//! A verifier checks a dataset against its JSON Schema and a set of semantic
//! rules, collecting every failure rather than stopping at the first one.

use serde::{Deserialize, Serialize};

/// The result of verifying one dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if all rules passed.
    pub passed: bool,
    /// Number of user records inspected by the semantic rules.
    pub users_checked: usize,
    /// All failures collected during this verification run. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// Failures raised by `rule_id`.
    pub fn failures_for<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a VerificationFailure> {
        self.failures.iter().filter(move |f| f.rule_id == rule_id)
    }
}

/// A single rule failure within a `VerificationReport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// The rule that failed, e.g. `purchase-order`.
    pub rule_id: String,
    /// The offending user, when the failure is scoped to one record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Human-readable explanation of why the rule failed.
    pub message: String,
}
