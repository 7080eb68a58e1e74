//! JSON Schema for the dataset file.
//!
//! Covers field names, nesting, types, ID and timestamp formats, and numeric
//! ranges. Relationships between fields (ordering, derivation) are left to
//! the semantic rules.

use serde_json::{json, Value};

/// Identifier reported for structural failures.
pub const SCHEMA_RULE_ID: &str = "json-schema";

/// The dataset schema: a top-level array of user records.
pub fn dataset_schema() -> Value {
    let label_list = json!({
        "type": "array",
        "minItems": 1,
        "items": { "type": "string", "minLength": 1 }
    });
    let date = json!({ "type": "string", "pattern": "^[0-9]{4}-[0-9]{2}-[0-9]{2}$" });

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "rxsynth/dataset-v1",
        "type": "array",
        "items": {
            "type": "object",
            "additionalProperties": false,
            "required": [
                "user_id", "name", "gender", "date_of_birth", "address", "email",
                "phone_number", "allergies", "chronic_conditions",
                "purchase_history", "prescriptions"
            ],
            "properties": {
                "user_id": { "type": "string", "pattern": "^USER_[0-9]{4,}$" },
                "name": { "type": "string", "minLength": 1 },
                "gender": { "type": "string", "minLength": 1 },
                "date_of_birth": date.clone(),
                "address": { "type": "string" },
                "email": { "type": "string" },
                "phone_number": { "type": "string" },
                "allergies": label_list.clone(),
                "chronic_conditions": label_list,
                "purchase_history": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "additionalProperties": false,
                        "required": [
                            "order_id", "drug_name", "is_prescription", "quantity",
                            "purchase_date", "pharmacy"
                        ],
                        "properties": {
                            "order_id": { "type": "string", "pattern": "^ORD_[0-9A-Za-z]+_[0-9]{3,}$" },
                            "drug_name": { "type": "string", "minLength": 1 },
                            "is_prescription": { "type": "boolean" },
                            "quantity": { "type": "integer", "minimum": 1, "maximum": 3 },
                            "purchase_date": {
                                "type": "string",
                                "pattern": "^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}$"
                            },
                            "pharmacy": { "type": "string" }
                        }
                    }
                },
                "prescriptions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "additionalProperties": false,
                        "required": [
                            "prescription_id", "drug_name", "doctor_name", "issue_date",
                            "dosage", "refills_remaining", "is_auto_refill_enabled"
                        ],
                        "properties": {
                            "prescription_id": { "type": "string", "pattern": "^RX_[0-9A-Za-z]+_[0-9]{2,}$" },
                            "drug_name": { "type": "string", "minLength": 1 },
                            "doctor_name": { "type": "string" },
                            "issue_date": date,
                            "dosage": { "type": "string" },
                            "refills_remaining": { "type": "integer", "minimum": 0, "maximum": 5 },
                            "is_auto_refill_enabled": { "type": "boolean" }
                        }
                    }
                }
            }
        }
    })
}
