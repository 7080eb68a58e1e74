//! Synthetic user record types.
//!
//! A `UserRecord` is assembled from four independently generated parts:
//! an `Identity`, a `MedicalProfile`, a purchase history, and the
//! prescriptions derived from that history. Field names and nesting are the
//! on-disk JSON shape of the dataset.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Sentinel label meaning "no known allergies / conditions".
///
/// Only ever appears as the sole element of its list.
pub const NONE_LABEL: &str = "None";

/// Fabricated personal details for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub email: String,
    pub phone_number: String,
}

/// Allergies and chronic conditions for one user.
///
/// Both lists are non-empty; `["None"]` stands for "nothing reported".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalProfile {
    pub allergies: Vec<String>,
    pub chronic_conditions: Vec<String>,
}

impl MedicalProfile {
    /// True if `condition` is one of the user's chronic conditions.
    pub fn has_condition(&self, condition: &str) -> bool {
        self.chronic_conditions.iter().any(|c| c == condition)
    }
}

/// One pharmacy transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub order_id: String,
    pub drug_name: String,
    pub is_prescription: bool,
    pub quantity: u8,
    #[serde(with = "crate::timestamp::purchase_date")]
    pub purchase_date: NaiveDateTime,
    pub pharmacy: String,
}

/// A prescription derived from one or more prescription-only purchases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub prescription_id: String,
    pub drug_name: String,
    pub doctor_name: String,
    pub issue_date: NaiveDate,
    pub dosage: String,
    pub refills_remaining: u8,
    pub is_auto_refill_enabled: bool,
}

/// One complete synthetic user, as written to the dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub email: String,
    pub phone_number: String,
    pub allergies: Vec<String>,
    pub chronic_conditions: Vec<String>,
    pub purchase_history: Vec<Purchase>,
    pub prescriptions: Vec<Prescription>,
}

impl UserRecord {
    /// Assemble a record from its generated parts.
    pub fn assemble(
        identity: Identity,
        medical: MedicalProfile,
        purchase_history: Vec<Purchase>,
        prescriptions: Vec<Prescription>,
    ) -> Self {
        let Identity {
            user_id,
            name,
            gender,
            date_of_birth,
            address,
            email,
            phone_number,
        } = identity;
        let MedicalProfile {
            allergies,
            chronic_conditions,
        } = medical;

        Self {
            user_id,
            name,
            gender,
            date_of_birth,
            address,
            email,
            phone_number,
            allergies,
            chronic_conditions,
            purchase_history,
            prescriptions,
        }
    }
}
