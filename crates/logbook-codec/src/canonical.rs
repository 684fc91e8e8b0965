//! Canonical byte encoding for `LogRecord`.
//!
//! Several peers serialize the same record independently while endorsing one
//! transaction, and their outputs are compared byte for byte. The encoding is
//! therefore pinned down explicitly rather than left to whatever order a
//! derive or a map happens to produce:
//!
//!   * compact JSON (no whitespace),
//!   * one object with exactly the seven fields in `CANONICAL_FIELDS` order,
//!     which is byte-lexicographic by wire name,
//!   * `port` as a JSON integer, every other field as a JSON string.
//!
//! Encoding goes through `CanonicalView`, a borrowed struct whose field
//! declaration order *is* the canonical order. serde emits struct fields in
//! declaration order, so no map is ever involved.

use serde::{Deserialize, Serialize};

use logbook_contracts::{error::CodecError, record::LogRecord};

/// Wire names in the order they appear in every encoded record.
pub const CANONICAL_FIELDS: [&str; 7] = [
    "ID",
    "event",
    "ipAddress",
    "port",
    "server",
    "timestamp",
    "user",
];

/// Borrowed serialization view. Field order must match `CANONICAL_FIELDS`.
#[derive(Serialize)]
struct CanonicalView<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    event: &'a str,
    #[serde(rename = "ipAddress")]
    ip_address: &'a str,
    port: i64,
    server: &'a str,
    timestamp: &'a str,
    user: &'a str,
}

/// Owned decoding target. Unknown or duplicate fields are rejected so that a
/// stored value can only ever mean one record.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CanonicalRecord {
    #[serde(rename = "ID")]
    id: String,
    event: String,
    #[serde(rename = "ipAddress")]
    ip_address: String,
    port: i64,
    server: String,
    timestamp: String,
    user: String,
}

impl<'a> From<&'a LogRecord> for CanonicalView<'a> {
    fn from(record: &'a LogRecord) -> Self {
        Self {
            id: &record.id,
            event: &record.event,
            ip_address: &record.ip_address,
            port: record.port,
            server: &record.server,
            timestamp: &record.timestamp,
            user: &record.user,
        }
    }
}

impl From<CanonicalRecord> for LogRecord {
    fn from(c: CanonicalRecord) -> Self {
        LogRecord {
            id: c.id,
            timestamp: c.timestamp,
            server: c.server,
            user: c.user,
            event: c.event,
            port: c.port,
            ip_address: c.ip_address,
        }
    }
}

/// Encode `record` to its canonical bytes.
///
/// Equal records produce identical bytes on every machine and every run.
pub fn encode(record: &LogRecord) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(&CanonicalView::from(record))
        .map_err(|source| CodecError::Encode { source })
}

/// Decode canonical bytes back into a `LogRecord`.
///
/// Field order in the input is not checked, but every field must be present
/// exactly once with the right type, nothing else may be present, and no
/// trailing data may follow the object.
pub fn decode(bytes: &[u8]) -> Result<LogRecord, CodecError> {
    serde_json::from_slice::<CanonicalRecord>(bytes)
        .map(LogRecord::from)
        .map_err(|source| CodecError::Decode { source })
}
