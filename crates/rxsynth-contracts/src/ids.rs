//! Identifier newtypes.
//!
//! User IDs carry a zero-padded numeric suffix (`USER_0042`). Order and
//! prescription IDs reuse that suffix, so they are unique within one user
//! but may repeat across users.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of one synthetic user, e.g. `USER_0007`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub const PREFIX: &'static str = "USER_";

    /// Build the ID for the 1-based population index `index`.
    pub fn from_index(index: u32) -> Self {
        Self(format!("{}{:04}", Self::PREFIX, index))
    }

    /// The numeric part after the first underscore (`"0007"` for `USER_0007`).
    ///
    /// Falls back to the whole string for IDs without an underscore.
    pub fn suffix(&self) -> &str {
        self.0.split_once('_').map(|(_, s)| s).unwrap_or(&self.0)
    }

    /// Order ID for the `seq`-th purchase (1-based) of this user.
    pub fn order_id(&self, seq: usize) -> String {
        format!("ORD_{}_{:03}", self.suffix(), seq)
    }

    /// Prescription ID for the `seq`-th emitted prescription (1-based).
    pub fn prescription_id(&self, seq: usize) -> String {
        format!("RX_{}_{:02}", self.suffix(), seq)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
