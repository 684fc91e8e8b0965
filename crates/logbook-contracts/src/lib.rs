//! # logbook-contracts
//!
//! Shared types and error definitions for the logbook contract.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod error;
pub mod record;
pub mod state;

pub use error::{CodecError, LogbookError, LogbookResult, StateError, StateResult};
pub use record::LogRecord;
pub use state::{KeyValue, TxId};

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    fn sample() -> LogRecord {
        LogRecord::new(
            "log1",
            "2020-06-25 01:53:37",
            "mailsv1",
            "guest",
            "access denied",
            20,
            "168.156.11.24",
        )
    }

    // ── LogRecord ────────────────────────────────────────────────────────────

    #[test]
    fn log_record_uses_ledger_wire_names() {
        let value = serde_json::to_value(sample()).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj["ID"], "log1");
        assert_eq!(obj["ipAddress"], "168.156.11.24");
        assert_eq!(obj["port"], 20);
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("ip_address"));
    }

    #[test]
    fn log_record_missing_field_is_rejected() {
        let json = r#"{"ID":"log1","timestamp":"t","server":"s","user":"u","event":"e","port":1}"#;
        assert!(serde_json::from_str::<LogRecord>(json).is_err());
    }

    // ── TxId ─────────────────────────────────────────────────────────────────

    #[test]
    fn tx_id_new_produces_unique_values() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| TxId::new().to_string()).collect();
        assert_eq!(ids.len(), 100);
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn error_conflict_display() {
        let err = LogbookError::Conflict { id: "log7".to_string() };
        assert_eq!(err.to_string(), "the log log7 already exists");
    }

    #[test]
    fn error_not_found_display() {
        let err = LogbookError::NotFound { id: "missing-id".to_string() };
        assert_eq!(err.to_string(), "the log missing-id does not exist");
    }

    #[test]
    fn error_store_display_carries_operation_key_and_cause() {
        let err = LogbookError::Store {
            operation: "read_log",
            key: "log3".to_string(),
            source: StateError::Unavailable {
                reason: "peer offline".to_string(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("read_log"));
        assert!(msg.contains("log3"));
        assert!(msg.contains("peer offline"));

        let source = err.source().expect("store error must chain its cause");
        assert!(source.to_string().contains("world state unavailable"));
    }

    #[test]
    fn error_codec_display_carries_operation_and_key() {
        let source = serde_json::from_slice::<LogRecord>(b"not json").unwrap_err();
        let err = LogbookError::Codec {
            operation: "scan_logs",
            key: "log4".to_string(),
            source: CodecError::Decode { source },
        };
        let msg = err.to_string();
        assert!(msg.contains("scan_logs"));
        assert!(msg.contains("log4"));
        assert!(msg.contains("malformed log bytes"));
    }

    #[test]
    fn error_mvcc_conflict_display() {
        let err = StateError::MvccReadConflict {
            tx_id: "tx-1".to_string(),
            key: "log9".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("tx-1"));
        assert!(msg.contains("log9"));
    }

    #[test]
    fn error_config_error_display() {
        let err = LogbookError::ConfigError {
            reason: "missing namespace".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("missing namespace"));
    }
}
