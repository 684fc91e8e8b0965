//! Demo configuration loaded from an optional TOML file.
//!
//! Example:
//! ```toml
//! namespace = "logcc"
//!
//! [ledger]
//! max_open_iterators = 4
//!
//! [[records]]
//! ID = "log7"
//! timestamp = "2024-06-01 12:00:00"
//! server = "websv2"
//! user = "admin"
//! event = "login"
//! port = 443
//! ipAddress = "10.0.0.7"
//! ```

use std::path::Path;

use serde::Deserialize;

use logbook_contracts::{
    error::{LogbookError, LogbookResult},
    record::LogRecord,
};
use logbook_memory::LedgerConfig;

/// Namespace used when the config file does not name one.
pub const DEFAULT_NAMESPACE: &str = "logcc";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoConfig {
    /// Contract namespace on the in-memory ledger.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Extra logs created, in order, right after the seed set is committed.
    #[serde(default)]
    pub records: Vec<LogRecord>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            ledger: LedgerConfig::default(),
            records: Vec::new(),
        }
    }
}

impl DemoConfig {
    pub fn from_toml_str(s: &str) -> LogbookResult<Self> {
        let config: DemoConfig = toml::from_str(s).map_err(|e| LogbookError::ConfigError {
            reason: format!("failed to parse demo TOML: {}", e),
        })?;
        if config.namespace.is_empty() {
            return Err(LogbookError::ConfigError {
                reason: "namespace must not be empty".to_string(),
            });
        }
        config.ledger.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> LogbookResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LogbookError::ConfigError {
            reason: format!("failed to read demo config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DemoConfig::from_toml_str("").unwrap();
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.ledger, LedgerConfig::default());
        assert!(config.records.is_empty());
    }

    #[test]
    fn test_records_use_ledger_wire_names() {
        let toml = r#"
            namespace = "audit"

            [ledger]
            max_open_iterators = 2

            [[records]]
            ID = "log7"
            timestamp = "2024-06-01 12:00:00"
            server = "websv2"
            user = "admin"
            event = "login"
            port = 443
            ipAddress = "10.0.0.7"
        "#;

        let config = DemoConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.namespace, "audit");
        assert_eq!(config.ledger.max_open_iterators, 2);
        assert_eq!(config.records.len(), 1);
        assert_eq!(config.records[0].id, "log7");
        assert_eq!(config.records[0].ip_address, "10.0.0.7");
    }

    #[test]
    fn test_empty_namespace_is_rejected() {
        assert!(matches!(
            DemoConfig::from_toml_str(r#"namespace = """#),
            Err(LogbookError::ConfigError { .. })
        ));
    }
}
