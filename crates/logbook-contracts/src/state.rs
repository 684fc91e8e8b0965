//! World-state entry and transaction identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One `(key, value)` pair yielded by a world-state range cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// The world-state key.
    pub key: String,
    /// The raw stored bytes.
    pub value: Vec<u8>,
}

/// Unique identifier for one simulated ledger transaction.
///
/// Appears in commit receipts and validation failures so a rolled-back
/// invocation can be traced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(pub uuid::Uuid);

impl TxId {
    /// Create a new, unique transaction ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
