//! Wire formats for dataset timestamps.
//!
//! Purchase timestamps are written as `YYYY-MM-DD HH:MM:SS` (no `T`, no
//! offset). Plain dates use chrono's default `YYYY-MM-DD` encoding.

/// `strftime` pattern for `Purchase::purchase_date`.
pub const PURCHASE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `strftime` pattern for `date_of_birth` and `issue_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `#[serde(with = ...)]` module for `Purchase::purchase_date`.
pub mod purchase_date {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::PURCHASE_DATE_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(PURCHASE_DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, PURCHASE_DATE_FORMAT).map_err(de::Error::custom)
    }
}
