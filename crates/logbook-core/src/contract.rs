//! The logbook record manager.
//!
//! `LogContract` is the public contract surface. It holds no state: every
//! operation receives the transaction-scoped `WorldState` for the current
//! invocation and touches nothing else, so any honest peer executing the same
//! call against the same snapshot performs the same reads and byte-identical
//! writes.
//!
//! `create_log` checks for an existing key and then writes. The two steps are
//! not atomic here. Two transactions racing on the same `id` are serialized by
//! the host, which re-validates every key a transaction read before committing
//! it and rolls back the loser. The contract is correct under that external
//! serializability, not on its own.

use tracing::{debug, info, warn};

use logbook_codec::{decode, encode};
use logbook_contracts::{
    error::{LogbookError, LogbookResult},
    record::LogRecord,
};

use crate::{scan::LogScan, seed::seed_logs, traits::WorldState};

/// The record manager for `LogRecord`s.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogContract;

impl LogContract {
    /// Create the contract. It carries no fields.
    pub fn new() -> Self {
        Self
    }

    /// Write the fixed seed set (`log1`..`log6`) in order.
    ///
    /// No existence check is made; calling this twice rewrites the same keys
    /// with the same bytes. Stops at the first encode or store failure, and
    /// whatever was written before it is left for the host to commit or
    /// discard with the rest of the transaction.
    pub fn init_ledger(&self, ctx: &dyn WorldState) -> LogbookResult<()> {
        const OP: &str = "init_ledger";

        let seeds = seed_logs();
        for record in &seeds {
            self.put(ctx, OP, record)?;
        }

        info!(count = seeds.len(), "ledger initialized with seed logs");
        Ok(())
    }

    /// Store a new log under `record.id`.
    ///
    /// Fails with `LogbookError::Conflict` if a log with that id already
    /// exists; the stored value is left untouched in that case.
    pub fn create_log(&self, ctx: &dyn WorldState, record: &LogRecord) -> LogbookResult<()> {
        const OP: &str = "create_log";

        if self.lookup(ctx, OP, &record.id)?.is_some() {
            warn!(id = %record.id, "refusing to overwrite existing log");
            return Err(LogbookError::Conflict {
                id: record.id.clone(),
            });
        }

        self.put(ctx, OP, record)?;
        info!(id = %record.id, "log created");
        Ok(())
    }

    /// Return the log stored under `id`.
    ///
    /// A missing key is `LogbookError::NotFound`; a store failure is
    /// `LogbookError::Store` and is never reported as a miss.
    pub fn read_log(&self, ctx: &dyn WorldState, id: &str) -> LogbookResult<LogRecord> {
        const OP: &str = "read_log";

        let Some(bytes) = self.lookup(ctx, OP, id)? else {
            debug!(id = %id, "log not found");
            return Err(LogbookError::NotFound { id: id.to_string() });
        };

        decode(&bytes).map_err(|source| LogbookError::Codec {
            operation: OP,
            key: id.to_string(),
            source,
        })
    }

    /// Return true iff a non-empty entry is stored under `id`.
    pub fn log_exists(&self, ctx: &dyn WorldState, id: &str) -> LogbookResult<bool> {
        Ok(self.lookup(ctx, "log_exists", id)?.is_some())
    }

    /// Open a lazy scan over every log in the namespace, in ascending key
    /// order. The scan closes its cursor however iteration ends.
    pub fn scan_logs<'a>(&self, ctx: &'a dyn WorldState) -> LogbookResult<LogScan<'a>> {
        let cursor = ctx
            .get_state_by_range("", "")
            .map_err(|source| LogbookError::Store {
                operation: "scan_logs",
                key: String::new(),
                source,
            })?;
        debug!("log scan opened over full namespace");
        Ok(LogScan::new(cursor))
    }

    /// Collect every log in the namespace, failing on the first bad entry.
    pub fn get_all_logs(&self, ctx: &dyn WorldState) -> LogbookResult<Vec<LogRecord>> {
        let logs = self.scan_logs(ctx)?.collect::<LogbookResult<Vec<_>>>()?;
        debug!(count = logs.len(), "collected all logs");
        Ok(logs)
    }

    // ── Store access ──────────────────────────────────────────────────────────

    /// Point read that folds a present-but-empty value into "absent".
    fn lookup(
        &self,
        ctx: &dyn WorldState,
        operation: &'static str,
        key: &str,
    ) -> LogbookResult<Option<Vec<u8>>> {
        debug!(operation, key = %key, "reading world state");
        let value = ctx.get_state(key).map_err(|source| LogbookError::Store {
            operation,
            key: key.to_string(),
            source,
        })?;
        Ok(value.filter(|bytes| !bytes.is_empty()))
    }

    fn put(
        &self,
        ctx: &dyn WorldState,
        operation: &'static str,
        record: &LogRecord,
    ) -> LogbookResult<()> {
        let bytes = encode(record).map_err(|source| LogbookError::Codec {
            operation,
            key: record.id.clone(),
            source,
        })?;

        debug!(operation, key = %record.id, len = bytes.len(), "writing world state");
        ctx.put_state(&record.id, bytes)
            .map_err(|source| LogbookError::Store {
                operation,
                key: record.id.clone(),
                source,
            })
    }
}
