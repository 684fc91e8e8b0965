//! Ledger configuration.
//!
//! `LedgerConfig` is deserialized from TOML. Every field has a default, so an
//! empty document is a valid configuration.
//!
//! Example:
//! ```toml
//! max_open_iterators = 4
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use logbook_contracts::error::{LogbookError, LogbookResult};

/// Default cap on simultaneously open range iterators per transaction.
pub const DEFAULT_MAX_OPEN_ITERATORS: usize = 16;

/// Tunables for a `MemoryLedger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// How many range iterators one transaction may hold open at once.
    /// Opening another fails with `StateError::IteratorLimit`. Must be at
    /// least 1.
    pub max_open_iterators: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_open_iterators: DEFAULT_MAX_OPEN_ITERATORS,
        }
    }
}

impl LedgerConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `LogbookError::ConfigError` if the TOML is malformed, has
    /// unknown keys, or sets `max_open_iterators` to zero.
    pub fn from_toml_str(s: &str) -> LogbookResult<Self> {
        let config: LedgerConfig = toml::from_str(s).map_err(|e| LogbookError::ConfigError {
            reason: format!("failed to parse ledger TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as ledger configuration.
    pub fn from_file(path: &Path) -> LogbookResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LogbookError::ConfigError {
            reason: format!("failed to read ledger config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject settings the ledger cannot run with.
    pub fn validate(&self) -> LogbookResult<()> {
        if self.max_open_iterators == 0 {
            return Err(LogbookError::ConfigError {
                reason: "max_open_iterators must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
