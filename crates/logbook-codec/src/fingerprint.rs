//! SHA-256 fingerprints over canonical record bytes.
//!
//! Lets independent executions compare the value they would write without
//! exchanging the bytes themselves.

use sha2::{Digest, Sha256};

use logbook_contracts::{error::CodecError, record::LogRecord};

use crate::canonical::encode;

/// Lowercase 64-character hex SHA-256 of `encode(record)`.
pub fn fingerprint(record: &LogRecord) -> Result<String, CodecError> {
    let bytes = encode(record)?;
    Ok(fingerprint_bytes(&bytes))
}

/// Lowercase hex SHA-256 of already-encoded bytes.
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
