//! # logbook-codec
//!
//! Canonical encoding for logbook records.
//!
//! Every participant must produce byte-identical world-state writes for the
//! same input, so records are never serialized through a map or a default
//! derive. [`encode`] writes compact JSON with a fixed field order
//! ([`CANONICAL_FIELDS`]); [`decode`] parses it back strictly.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use logbook_codec::{decode, encode};
//!
//! let bytes = encode(&record)?;
//! assert_eq!(decode(&bytes)?, record);
//! ```

pub mod canonical;
pub mod fingerprint;

pub use canonical::{decode, encode, CANONICAL_FIELDS};
pub use fingerprint::{fingerprint, fingerprint_bytes};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use logbook_contracts::{error::CodecError, record::LogRecord};

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn log1() -> LogRecord {
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

    const LOG1_BYTES: &str = r#"{"ID":"log1","event":"access denied","ipAddress":"168.156.11.24","port":20,"server":"mailsv1","timestamp":"2020-06-25 01:53:37","user":"guest"}"#;

    // ── Encoding ──────────────────────────────────────────────────────────────

    /// The exact bytes are part of the ledger's wire format.
    #[test]
    fn test_encode_matches_golden_bytes() {
        let bytes = encode(&log1()).unwrap();
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), LOG1_BYTES);
    }

    /// Keys appear in `CANONICAL_FIELDS` order, which is itself sorted.
    #[test]
    fn test_encode_field_order_is_canonical() {
        let text = String::from_utf8(encode(&log1()).unwrap()).unwrap();

        let positions: Vec<usize> = CANONICAL_FIELDS
            .iter()
            .map(|name| text.find(&format!("\"{name}\":")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "fields out of order: {text}");

        let mut sorted = CANONICAL_FIELDS;
        sorted.sort_unstable();
        assert_eq!(sorted, CANONICAL_FIELDS, "canonical order must be byte-lexicographic");
    }

    /// Repeated encodings of equal values are byte-identical.
    #[test]
    fn test_encode_is_deterministic() {
        let a = log1();
        let b = a.clone();
        let first = encode(&a).unwrap();
        for _ in 0..50 {
            assert_eq!(encode(&b).unwrap(), first);
        }
    }

    /// Escaping is stable for quotes, control characters and non-ASCII text.
    #[test]
    fn test_encode_escapes_special_characters() {
        let mut record = log1();
        record.event = "quote \" tab \t ünïcødé".to_string();
        let text = String::from_utf8(encode(&record).unwrap()).unwrap();
        assert!(text.contains(r#""event":"quote \" tab \t ünïcødé""#), "got: {text}");
    }

    // ── Round trip ────────────────────────────────────────────────────────────

    #[test]
    fn test_round_trip_preserves_every_field() {
        let records = [
            log1(),
            LogRecord::new("log-neg", "", "", "", "", -1, ""),
            LogRecord::new("x", "t", "websv2", "root", "line\nbreak", i64::MAX, "::1"),
        ];
        for record in records {
            let decoded = decode(&encode(&record).unwrap()).unwrap();
            assert_eq!(decoded, record);
        }
    }

    /// Peers that emit the same fields in another order still decode.
    #[test]
    fn test_decode_accepts_any_field_order() {
        let reordered = r#"{"user":"guest","timestamp":"2020-06-25 01:53:37","server":"mailsv1","port":20,"ipAddress":"168.156.11.24","event":"access denied","ID":"log1"}"#;
        assert_eq!(decode(reordered.as_bytes()).unwrap(), log1());
    }

    // ── Malformed input ───────────────────────────────────────────────────────

    #[test]
    fn test_decode_rejects_malformed_input() {
        let cases: [&[u8]; 7] = [
            b"",
            b"not json",
            br#"{"ID":"log1"}"#,
            br#"{"ID":"log1","event":"e","ipAddress":"i","port":"20","server":"s","timestamp":"t","user":"u"}"#,
            br#"{"ID":"log1","event":"e","ipAddress":"i","port":20,"server":"s","timestamp":"t","user":"u","extra":1}"#,
            br#"{"ID":"log1","ID":"log2","event":"e","ipAddress":"i","port":20,"server":"s","timestamp":"t","user":"u"}"#,
            br#"{"ID":"log1","event":"e","ipAddress":"i","port":20,"server":"s","timestamp":"t","user":"u"} trailing"#,
        ];
        for bytes in cases {
            match decode(bytes) {
                Err(CodecError::Decode { .. }) => {}
                other => panic!(
                    "expected Decode error for {:?}, got {:?}",
                    String::from_utf8_lossy(bytes),
                    other
                ),
            }
        }
    }

    // ── Fingerprint ───────────────────────────────────────────────────────────

    #[test]
    fn test_fingerprint_matches_golden_digest() {
        assert_eq!(
            fingerprint(&log1()).unwrap(),
            "612d1114fabd859f5d0d12f983b48869fcc7c670ae21571ac860379146dda3b9"
        );
        assert_eq!(fingerprint_bytes(LOG1_BYTES.as_bytes()), fingerprint(&log1()).unwrap());
    }

    #[test]
    fn test_fingerprint_changes_with_any_field() {
        let base = fingerprint(&log1()).unwrap();
        let mut changed = log1();
        changed.port = 21;
        assert_ne!(fingerprint(&changed).unwrap(), base);
    }
}
