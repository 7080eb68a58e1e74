//! # rxsynth-contracts
//!
//! Shared types for the rxsynth workspace.
//!
//! All crates in the workspace import from here. No generation logic lives
//! in this crate: only record definitions, identifiers, wire formats,
//! verification reports and error types.

pub mod error;
pub mod ids;
pub mod record;
pub mod timestamp;
pub mod verify;

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::json;

    use super::*;
    use error::SynthError;
    use ids::UserId;
    use record::{Identity, MedicalProfile, Prescription, Purchase, UserRecord};
    use timestamp::{DATE_FORMAT, PURCHASE_DATE_FORMAT};

    fn purchase_at(raw: &str) -> Purchase {
        Purchase {
            order_id: "ORD_0001_001".to_string(),
            drug_name: "Metformin 500mg".to_string(),
            is_prescription: true,
            quantity: 2,
            purchase_date: NaiveDateTime::parse_from_str(raw, PURCHASE_DATE_FORMAT).unwrap(),
            pharmacy: "Acme Ltd Pharmacy".to_string(),
        }
    }

    // ── UserId ───────────────────────────────────────────────────────────────

    #[test]
    fn user_id_is_zero_padded_to_four_digits() {
        assert_eq!(UserId::from_index(1).as_str(), "USER_0001");
        assert_eq!(UserId::from_index(42).as_str(), "USER_0042");
        assert_eq!(UserId::from_index(12345).as_str(), "USER_12345");
    }

    #[test]
    fn derived_ids_reuse_the_numeric_suffix() {
        let id = UserId::from_index(7);
        assert_eq!(id.suffix(), "0007");
        assert_eq!(id.order_id(3), "ORD_0007_003");
        assert_eq!(id.prescription_id(12), "RX_0007_12");
    }

    #[test]
    fn suffix_without_underscore_is_whole_id() {
        let id = UserId("legacy".to_string());
        assert_eq!(id.suffix(), "legacy");
    }

    // ── Wire format ──────────────────────────────────────────────────────────

    #[test]
    fn purchase_date_uses_space_separated_format() {
        let value = serde_json::to_value(purchase_at("2025-03-04 05:06:07")).unwrap();
        assert_eq!(value["purchase_date"], json!("2025-03-04 05:06:07"));
    }

    #[test]
    fn purchase_date_rejects_iso_t_separator() {
        let mut value = serde_json::to_value(purchase_at("2025-03-04 05:06:07")).unwrap();
        value["purchase_date"] = json!("2025-03-04T05:06:07");
        assert!(serde_json::from_value::<Purchase>(value).is_err());
    }

    #[test]
    fn user_record_has_flat_field_layout() {
        let identity = Identity {
            user_id: UserId::from_index(1),
            name: "Jane Roe".to_string(),
            gender: "F".to_string(),
            date_of_birth: NaiveDate::parse_from_str("1980-02-29", DATE_FORMAT).unwrap(),
            address: "1 Main St, Springfield, IL 62701".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: "555-0100".to_string(),
        };
        let medical = MedicalProfile {
            allergies: vec!["Latex".to_string()],
            chronic_conditions: vec!["None".to_string()],
        };
        let rx = Prescription {
            prescription_id: "RX_0001_01".to_string(),
            drug_name: "Metformin 500mg".to_string(),
            doctor_name: "Dr. Smith".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            dosage: "500mg".to_string(),
            refills_remaining: 3,
            is_auto_refill_enabled: false,
        };

        let record = UserRecord::assemble(
            identity,
            medical,
            vec![purchase_at("2025-03-04 05:06:07")],
            vec![rx],
        );
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["user_id"], json!("USER_0001"));
        assert_eq!(value["date_of_birth"], json!("1980-02-29"));
        assert_eq!(value["allergies"], json!(["Latex"]));
        assert_eq!(value["prescriptions"][0]["issue_date"], json!("2025-03-01"));
        assert_eq!(value.as_object().unwrap().len(), 11);

        let decoded: UserRecord = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn has_condition_matches_exact_label() {
        let medical = MedicalProfile {
            allergies: vec!["None".to_string()],
            chronic_conditions: vec!["Type 2 Diabetes".to_string()],
        };
        assert!(medical.has_condition("Type 2 Diabetes"));
        assert!(!medical.has_condition("Diabetes"));
    }

    // ── SynthError display messages ──────────────────────────────────────────

    #[test]
    fn error_internal_consistency_display() {
        let err = SynthError::InternalConsistency {
            reason: "sample of 4 exceeds vocabulary of 3".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("internal consistency"));
        assert!(msg.contains("vocabulary of 3"));
    }

    #[test]
    fn error_fetch_failed_display() {
        let err = SynthError::FetchFailed {
            url: "https://example.org/".to_string(),
            reason: "HTTP 503".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.org/"));
        assert!(msg.contains("HTTP 503"));
    }

    #[test]
    fn error_output_write_failed_display() {
        let err = SynthError::OutputWriteFailed {
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("output write failed: disk full"));
    }

    #[test]
    fn error_verification_failed_is_distinct_from_schema_errors() {
        let err = SynthError::VerificationFailed {
            reason: "data.json failed verification with 2 failure(s)".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("verification failed:"));
        assert!(!msg.contains("schema"));
    }
}
