//! # rxsynth-verify
//!
//! Dataset verification for rxsynth.
//!
//! This crate provides [`engine::DatasetVerifier`], which checks a dataset
//! in two phases:
//!
//! 1. **Structural**: JSON Schema validation via the `jsonschema` crate.
//! 2. **Semantic**: the record invariants (`"None"` exclusivity, purchase
//!    ordering, prescription derivation, ID uniqueness, catalog membership,
//!    value ranges) evaluated against decoded `UserRecord`s.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use rxsynth_verify::DatasetVerifier;
//!
//! let verifier = DatasetVerifier::new().with_catalog(Catalog::builtin());
//! let report = verifier.verify_value(&serde_json::from_str(&text)?)?;
//! assert!(report.passed);
//! ```

pub mod engine;
pub mod rules;
pub mod schema;

pub use engine::DatasetVerifier;
pub use rules::{DatasetRule, RuleContext};
pub use schema::dataset_schema;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use serde_json::json;

    use rxsynth_contracts::{ids::UserId, record::UserRecord, verify::VerificationReport};
    use rxsynth_core::{run_rng, Catalog, DatasetGenerator};

    use super::{DatasetRule, DatasetVerifier};

    // ── Builder helpers ───────────────────────────────────────────────────────

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn generated(n: u32, seed: u64) -> Vec<UserRecord> {
        DatasetGenerator::new(Catalog::builtin())
            .at(fixed_now())
            .generate(n, &mut run_rng(Some(seed)))
            .unwrap()
    }

    /// A generated user guaranteed to hold at least one prescription.
    fn user_with_prescription() -> UserRecord {
        generated(200, 21)
            .into_iter()
            .find(|u| !u.prescriptions.is_empty())
            .expect("some user in 200 buys a prescription drug")
    }

    fn rule_ids(report: &VerificationReport) -> Vec<&str> {
        report.failures.iter().map(|f| f.rule_id.as_str()).collect()
    }

    // ── Generated data passes ─────────────────────────────────────────────────

    #[test]
    fn test_generated_dataset_passes_all_rules() {
        let users = generated(100, 20);
        let verifier = DatasetVerifier::new()
            .with_catalog(Catalog::builtin())
            .as_of(fixed_now());

        let report = verifier.verify_value(&serde_json::to_value(&users).unwrap()).unwrap();

        assert!(report.passed, "unexpected failures: {:?}", report.failures);
        assert_eq!(report.users_checked, 100);
    }

    #[test]
    fn test_empty_dataset_passes() {
        let report = DatasetVerifier::new().verify_value(&json!([])).unwrap();
        assert!(report.passed);
        assert_eq!(report.users_checked, 0);
    }

    // ── Structural failures ───────────────────────────────────────────────────

    #[test]
    fn test_schema_rejects_bad_timestamp_and_quantity() {
        let mut value = serde_json::to_value(generated(1, 22)).unwrap();
        value[0]["purchase_history"][0]["purchase_date"] = json!("2025-01-01T10:00:00");
        value[0]["purchase_history"][0]["quantity"] = json!(7);

        let report = DatasetVerifier::new().verify_value(&value).unwrap();

        assert!(!report.passed);
        assert!(report.failures_for("json-schema").count() >= 2);
        // The bad timestamp also stops typed decoding.
        assert_eq!(report.failures_for("decode").count(), 1);
    }

    #[test]
    fn test_schema_rejects_unknown_field() {
        let mut value = serde_json::to_value(generated(1, 23)).unwrap();
        value[0]["ssn"] = json!("123-45-6789");

        let report = DatasetVerifier::new().verify_value(&value).unwrap();

        assert!(!report.passed);
        assert_eq!(rule_ids(&report), vec!["json-schema"]);
    }

    #[test]
    fn test_non_array_dataset_fails() {
        let report = DatasetVerifier::new()
            .verify_value(&json!({ "users": [] }))
            .unwrap();
        assert!(!report.passed);
        assert!(report.failures_for("json-schema").count() >= 1);
        assert!(report.failures_for("decode").count() == 1);
    }

    // ── Semantic failures ─────────────────────────────────────────────────────

    #[test]
    fn test_none_mixed_with_allergy_fails() {
        let mut user = generated(1, 24).remove(0);
        user.allergies = vec!["None".to_string(), "Latex".to_string()];

        let report = DatasetVerifier::new().verify_records(&[user]);

        assert_eq!(rule_ids(&report), vec!["none-exclusive"]);
        assert_eq!(report.failures[0].user_id.as_deref(), Some("USER_0001"));
    }

    #[test]
    fn test_unsorted_history_fails() {
        let mut user = generated(1, 25).remove(0);
        user.purchase_history.reverse();

        let report = DatasetVerifier::new()
            .with_rules(&[DatasetRule::PurchaseOrder])
            .verify_records(&[user]);

        assert!(!report.passed);
        assert!(report.failures.iter().all(|f| f.rule_id == "purchase-order"));
    }

    #[test]
    fn test_short_history_fails() {
        let mut user = generated(1, 26).remove(0);
        user.purchase_history.truncate(2);

        let report = DatasetVerifier::new()
            .with_rules(&[DatasetRule::PurchaseCount])
            .verify_records(&[user]);

        assert_eq!(rule_ids(&report), vec!["purchase-count"]);
    }

    #[test]
    fn test_orphan_prescription_fails() {
        let mut user = user_with_prescription();
        user.prescriptions[0].drug_name = "Losartan 50mg Extra".to_string();

        let report = DatasetVerifier::new()
            .with_rules(&[DatasetRule::RxDerived])
            .verify_records(&[user]);

        // The renamed prescription is orphaned and its real drug is now uncovered.
        assert_eq!(report.failures_for("rx-derived").count(), 2);
    }

    #[test]
    fn test_late_issue_date_fails() {
        let mut user = user_with_prescription();
        let drug = user.prescriptions[0].drug_name.clone();
        let latest = user
            .purchase_history
            .iter()
            .filter(|p| p.is_prescription && p.drug_name == drug)
            .map(|p| p.purchase_date)
            .max()
            .unwrap();
        user.prescriptions[0].issue_date = (latest + Duration::days(1)).date();

        let report = DatasetVerifier::new().verify_records(&[user]);

        assert_eq!(rule_ids(&report), vec!["rx-issue-before-purchase"]);
    }

    #[test]
    fn test_duplicate_prescription_drug_fails() {
        let mut user = user_with_prescription();
        let mut copy = user.prescriptions[0].clone();
        copy.prescription_id = "RX_9999_99".to_string();
        user.prescriptions.push(copy);

        let report = DatasetVerifier::new()
            .with_rules(&[DatasetRule::RxUniqueDrug])
            .verify_records(&[user]);

        assert_eq!(rule_ids(&report), vec!["rx-unique-drug"]);
    }

    #[test]
    fn test_duplicate_ids_fail() {
        let mut users = generated(2, 27);
        users[1].user_id = UserId::from_index(1);
        let first_order = users[0].purchase_history[0].order_id.clone();
        users[0].purchase_history[1].order_id = first_order;

        let report = DatasetVerifier::new()
            .with_rules(&[DatasetRule::UniqueIds])
            .verify_records(&users);

        assert_eq!(report.failures_for("unique-ids").count(), 2);
        assert!(report
            .failures
            .iter()
            .any(|f| f.user_id.is_none() && f.message.contains("USER_0001")));
    }

    #[test]
    fn test_out_of_range_quantity_fails_on_typed_records() {
        let mut user = generated(1, 29).remove(0);
        user.purchase_history[0].quantity = 200;

        let report = DatasetVerifier::new()
            .with_catalog(Catalog::builtin())
            .verify_records(&[user]);

        assert_eq!(rule_ids(&report), vec!["value-ranges"]);
        assert!(report.failures[0].message.contains("quantity 200"));
    }

    #[test]
    fn test_bad_refills_and_dosage_fail() {
        let mut user = user_with_prescription();
        user.prescriptions[0].refills_remaining = 9;
        user.prescriptions[0].dosage = "one tablet".to_string();

        let report = DatasetVerifier::new()
            .with_rules(&[DatasetRule::ValueRanges])
            .verify_records(&[user]);

        assert_eq!(report.failures_for("value-ranges").count(), 2);
    }

    #[test]
    fn test_purchases_outside_history_window_fail() {
        let mut user = generated(1, 30).remove(0);
        let verifier = DatasetVerifier::new().with_rules(&[DatasetRule::ValueRanges]);

        assert!(verifier.clone().as_of(fixed_now()).verify_records(&[user.clone()]).passed);

        // A run time before the purchases puts them in the future.
        let earlier = fixed_now() - Duration::days(800);
        assert!(!verifier.clone().as_of(earlier).verify_records(&[user.clone()]).passed);

        // Without a run time, only the spread of dates is checked.
        let last = user.purchase_history.len() - 1;
        user.purchase_history[0].purchase_date = fixed_now();
        user.purchase_history[last].purchase_date = fixed_now() - Duration::days(900);
        let report = verifier.verify_records(&[user]);
        assert_eq!(rule_ids(&report), vec!["value-ranges"]);
        assert!(report.failures[0].message.contains("wider than 730 days"));
    }

    #[test]
    fn test_catalog_membership_only_with_catalog() {
        let mut user = generated(1, 28).remove(0);
        user.purchase_history[0].is_prescription = !user.purchase_history[0].is_prescription;
        let users = [user];

        let with_catalog = DatasetVerifier::new()
            .with_catalog(Catalog::builtin())
            .with_rules(&[DatasetRule::CatalogMembership])
            .verify_records(&users);
        assert_eq!(rule_ids(&with_catalog), vec!["catalog-membership"]);

        let without_catalog = DatasetVerifier::new()
            .with_rules(&[DatasetRule::CatalogMembership])
            .verify_records(&users);
        assert!(without_catalog.passed);
    }
}
