//! The `LogRecord` entity stored by the contract.
//!
//! A log is a flat, fixed-schema security event. Every field is required.
//! Wire names match the ones other participants already use on the ledger
//! (`ID`, `ipAddress`), so records written by any conforming peer decode here.

use serde::{Deserialize, Serialize};

/// A single security/audit event held in world state under its `id`.
///
/// Records are immutable once written: the contract exposes no update or
/// delete, and `create_log` refuses to overwrite an existing `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Unique identifier, also the world-state key. Must be non-empty.
    #[serde(rename = "ID")]
    pub id: String,
    /// Caller-supplied timestamp. Never parsed or interpreted.
    pub timestamp: String,
    /// Host that emitted the event (e.g. "mailsv1").
    pub server: String,
    /// Account the event is attributed to.
    pub user: String,
    /// Free-form event description (e.g. "access denied").
    pub event: String,
    /// Port the event was observed on.
    pub port: i64,
    /// Source address of the event.
    #[serde(rename = "ipAddress")]
    pub ip_address: String,
}

impl LogRecord {
    /// Build a record from its seven fields, in the order callers usually
    /// supply them.
    pub fn new(
        id: impl Into<String>,
        timestamp: impl Into<String>,
        server: impl Into<String>,
        user: impl Into<String>,
        event: impl Into<String>,
        port: i64,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
            server: server.into(),
            user: user.into(),
            event: event.into(),
            port,
            ip_address: ip_address.into(),
        }
    }
}
