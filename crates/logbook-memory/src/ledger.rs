//! The in-memory ledger: committed world state plus commit-time validation.
//!
//! Commit follows optimistic concurrency control. A transaction is simulated
//! against a snapshot, then at commit time:
//!
//! 1. every point read must still see the version it saw during simulation,
//! 2. every range query must still return exactly the same keys and versions,
//! 3. only then are the buffered writes applied, all at the next block height.
//!
//! A transaction that fails either check is rolled back in full. This is what
//! makes the contract's check-then-write in `create_log` safe: of two
//! transactions racing to create the same id, the second to commit finds its
//! "absent" read stale and is rejected.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use logbook_contracts::{
    error::{StateError, StateResult},
    state::TxId,
};

use crate::{
    config::LedgerConfig,
    rwset::KeyVersion,
    transaction::{range_entries, validate_key, MemoryTransaction, Namespace, VersionedValue},
};

/// Proof that a transaction's writes were applied.
#[derive(Debug, Clone, Serialize)]
pub struct CommitReceipt {
    /// The committed transaction.
    pub tx_id: TxId,
    /// Height assigned to this commit; also the version of every key it wrote.
    pub block_height: u64,
    /// Number of keys written or deleted.
    pub writes: usize,
    /// `ReadWriteSet::digest()` of the committed simulation.
    pub rwset_digest: String,
    /// Wall-clock time (UTC) the commit was applied.
    pub committed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct LedgerState {
    namespaces: std::collections::BTreeMap<String, Namespace>,
    height: u64,
}

/// A shared, in-process ledger holding committed state for any number of
/// contract namespaces.
///
/// Cloning is cheap and every clone sees the same state, the way every
/// transaction on a peer sees the same committed ledger.
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    config: LedgerConfig,
    state: Arc<Mutex<LedgerState>>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    /// An empty ledger with default configuration.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// An empty ledger with the given configuration.
    pub fn with_config(config: LedgerConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(LedgerState::default())),
        }
    }

    /// Height of the latest commit (0 before any commit).
    pub fn height(&self) -> StateResult<u64> {
        Ok(self.lock()?.height)
    }

    /// Start a transaction against the current committed state of `namespace`.
    pub fn begin(&self, namespace: impl Into<String>) -> StateResult<MemoryTransaction> {
        let namespace = namespace.into();
        let state = self.lock()?;
        let snapshot = state.namespaces.get(&namespace).cloned().unwrap_or_default();
        debug!(namespace = %namespace, height = state.height, "transaction started");
        Ok(MemoryTransaction::new(
            namespace,
            snapshot,
            self.config.max_open_iterators,
        ))
    }

    /// Validate `tx` against the latest committed state and apply its writes.
    ///
    /// Returns `StateError::MvccReadConflict` or `StateError::PhantomRead`
    /// when the transaction's reads are stale; nothing is applied then.
    pub fn commit(&self, tx: MemoryTransaction) -> StateResult<CommitReceipt> {
        let (tx_id, rwset, open_iterators) = tx.into_parts()?;
        if open_iterators > 0 {
            warn!(tx_id = %tx_id, open_iterators, "committing transaction with unclosed iterators");
        }

        let digest = rwset.digest()?;
        let mut state = self.lock()?;

        // Validation reads the live namespace; an absent namespace is empty.
        let empty = Namespace::new();
        let current = state.namespaces.get(&rwset.namespace).unwrap_or(&empty);

        for (key, seen) in &rwset.reads {
            let now = current.get(key).map(|v| v.version);
            if now != *seen {
                warn!(tx_id = %tx_id, key = %key, ?seen, ?now, "MVCC read conflict; rolling back");
                return Err(StateError::MvccReadConflict {
                    tx_id: tx_id.to_string(),
                    key: key.clone(),
                });
            }
        }

        for query in &rwset.range_queries {
            let now: Vec<KeyVersion> = range_entries(current, &query.start_key, &query.end_key)?
                .map(|(key, v)| KeyVersion {
                    key: key.clone(),
                    version: v.version,
                })
                .collect();
            if now != query.results {
                warn!(
                    tx_id = %tx_id,
                    start_key = %query.start_key,
                    end_key = %query.end_key,
                    "phantom read; rolling back"
                );
                return Err(StateError::PhantomRead {
                    tx_id: tx_id.to_string(),
                    start_key: query.start_key.clone(),
                    end_key: query.end_key.clone(),
                });
            }
        }

        state.height += 1;
        let height = state.height;
        let writes = rwset.writes.len();
        let ns = state.namespaces.entry(rwset.namespace.clone()).or_default();
        for (key, value) in rwset.writes {
            if value.is_empty() {
                ns.remove(&key);
            } else {
                ns.insert(key, VersionedValue { value, version: height });
            }
        }

        info!(
            tx_id = %tx_id,
            namespace = %rwset.namespace,
            block_height = height,
            writes,
            rwset_digest = %digest,
            "transaction committed"
        );

        Ok(CommitReceipt {
            tx_id,
            block_height: height,
            writes,
            rwset_digest: digest,
            committed_at: Utc::now(),
        })
    }

    /// Abort `tx` explicitly. Equivalent to dropping it, but logged.
    pub fn discard(&self, tx: MemoryTransaction) {
        info!(tx_id = %tx.tx_id(), namespace = %tx.namespace(), "transaction discarded");
    }

    /// The committed bytes under `key` in `namespace`, bypassing any
    /// transaction. For inspection only; contract code never calls this.
    pub fn committed_value(&self, namespace: &str, key: &str) -> StateResult<Option<Vec<u8>>> {
        validate_key(key)?;
        let state = self.lock()?;
        Ok(state
            .namespaces
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .map(|v| v.value.clone()))
    }

    /// Number of committed keys in `namespace`.
    pub fn key_count(&self, namespace: &str) -> StateResult<usize> {
        Ok(self.lock()?.namespaces.get(namespace).map_or(0, |ns| ns.len()))
    }

    fn lock(&self) -> StateResult<MutexGuard<'_, LedgerState>> {
        self.state.lock().map_err(|e| StateError::Unavailable {
            reason: format!("ledger state lock poisoned: {}", e),
        })
    }
}
