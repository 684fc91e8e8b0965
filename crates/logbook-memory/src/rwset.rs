//! Read/write sets captured while simulating a transaction.
//!
//! The read half is what commit-time validation checks against the latest
//! committed state. The write half is what gets applied if validation passes.
//! Two peers that simulate the same invocation against the same snapshot
//! must end up with equal sets, which `digest()` makes cheap to compare.
//!
//! The digest is SHA-256 over the compact `serde_json` form of the set. Both
//! maps are `BTreeMap`s and range queries keep their open order, so equal sets
//! always serialize to equal bytes.

use std::collections::BTreeMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use logbook_contracts::error::{StateError, StateResult};

/// A key and the version it had when a range query returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyVersion {
    pub key: String,
    pub version: u64,
}

/// One range query issued during simulation and what it returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeQueryInfo {
    pub start_key: String,
    pub end_key: String,
    pub results: Vec<KeyVersion>,
}

/// Everything a transaction read and wrote in one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadWriteSet {
    /// The contract namespace the transaction ran in.
    pub namespace: String,
    /// Point reads: key → version observed, `None` when the key was absent.
    /// Only the first read of a key is recorded.
    pub reads: BTreeMap<String, Option<u64>>,
    /// Range queries in the order they were opened.
    pub range_queries: Vec<RangeQueryInfo>,
    /// Buffered writes, last write wins. An empty value deletes the key.
    pub writes: BTreeMap<String, Vec<u8>>,
}

impl ReadWriteSet {
    pub(crate) fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// SHA-256 (lowercase hex) over `serde_json::to_vec(self)`.
    pub fn digest(&self) -> StateResult<String> {
        let json = serde_json::to_vec(self).map_err(|e| StateError::Unavailable {
            reason: format!("read/write set is not serializable: {}", e),
        })?;
        Ok(hex::encode(Sha256::digest(&json)))
    }
}
