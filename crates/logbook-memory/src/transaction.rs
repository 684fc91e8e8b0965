//! Transaction-scoped `WorldState` handles.
//!
//! A `MemoryTransaction` simulates one invocation against a snapshot of a
//! single namespace taken when the transaction began. Reads are served from
//! that snapshot only, so a transaction never sees its own buffered writes.
//! Every read and write is captured in a `ReadWriteSet` that
//! `MemoryLedger::commit` validates and applies.

use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use logbook_contracts::{
    error::{StateError, StateResult},
    state::{KeyValue, TxId},
};
use logbook_core::traits::{StateIterator, WorldState};

use crate::rwset::{KeyVersion, RangeQueryInfo, ReadWriteSet};

/// A committed value and the block height that wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VersionedValue {
    pub(crate) value: Vec<u8>,
    pub(crate) version: u64,
}

pub(crate) type Namespace = BTreeMap<String, VersionedValue>;

/// Mutable simulation state, shared with the iterators a transaction hands out.
#[derive(Debug)]
struct Simulation {
    rwset: ReadWriteSet,
    open_iterators: usize,
}

/// A transaction-scoped handle over one namespace of a `MemoryLedger`.
///
/// Obtain one from `MemoryLedger::begin`, pass it to contract operations,
/// then hand it back to `MemoryLedger::commit`. Dropping it aborts the
/// transaction; none of its writes are ever applied.
#[derive(Debug)]
pub struct MemoryTransaction {
    tx_id: TxId,
    namespace: String,
    snapshot: Namespace,
    max_open_iterators: usize,
    sim: Mutex<Simulation>,
}

impl MemoryTransaction {
    pub(crate) fn new(
        namespace: String,
        snapshot: Namespace,
        max_open_iterators: usize,
    ) -> Self {
        let rwset = ReadWriteSet::new(namespace.clone());
        Self {
            tx_id: TxId::new(),
            namespace,
            snapshot,
            max_open_iterators,
            sim: Mutex::new(Simulation {
                rwset,
                open_iterators: 0,
            }),
        }
    }

    /// This transaction's unique ID.
    pub fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    /// The namespace this transaction reads and writes.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Number of range iterators opened and not yet closed.
    pub fn open_iterators(&self) -> StateResult<usize> {
        Ok(self.lock()?.open_iterators)
    }

    /// A copy of everything read and written so far.
    pub fn read_write_set(&self) -> StateResult<ReadWriteSet> {
        Ok(self.lock()?.rwset.clone())
    }

    pub(crate) fn into_parts(self) -> StateResult<(TxId, ReadWriteSet, usize)> {
        let sim = self.sim.into_inner().map_err(|e| StateError::Unavailable {
            reason: format!("transaction state lock poisoned: {}", e),
        })?;
        Ok((self.tx_id, sim.rwset, sim.open_iterators))
    }

    fn lock(&self) -> StateResult<MutexGuard<'_, Simulation>> {
        lock_simulation(&self.sim)
    }
}

fn lock_simulation(sim: &Mutex<Simulation>) -> StateResult<MutexGuard<'_, Simulation>> {
    sim.lock().map_err(|e| StateError::Unavailable {
        reason: format!("transaction state lock poisoned: {}", e),
    })
}

/// Keys must be non-empty and must not start with U+0000, which is reserved
/// for composite keys.
pub(crate) fn validate_key(key: &str) -> StateResult<()> {
    if key.is_empty() {
        return Err(StateError::InvalidKey {
            key: key.to_string(),
            reason: "key must not be empty".to_string(),
        });
    }
    if key.starts_with('\u{0}') {
        return Err(StateError::InvalidKey {
            key: key.to_string(),
            reason: "keys starting with U+0000 are reserved for composite keys".to_string(),
        });
    }
    Ok(())
}

/// Entries of `ns` in `[start_key, end_key)`, where an empty bound is open.
pub(crate) fn range_entries<'a>(
    ns: &'a Namespace,
    start_key: &str,
    end_key: &str,
) -> StateResult<impl Iterator<Item = (&'a String, &'a VersionedValue)>> {
    if !start_key.is_empty() && !end_key.is_empty() && start_key > end_key {
        return Err(StateError::InvalidKey {
            key: start_key.to_string(),
            reason: format!("range start is after range end '{}'", end_key),
        });
    }

    let lower = if start_key.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Included(start_key.to_string())
    };
    let upper = if end_key.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(end_key.to_string())
    };

    Ok(ns.range::<String, _>((lower, upper)))
}

impl WorldState for MemoryTransaction {
    fn get_state(&self, key: &str) -> StateResult<Option<Vec<u8>>> {
        validate_key(key)?;

        let entry = self.snapshot.get(key);
        self.lock()?
            .rwset
            .reads
            .entry(key.to_string())
            .or_insert_with(|| entry.map(|v| v.version));

        debug!(tx_id = %self.tx_id, key = %key, found = entry.is_some(), "get_state");
        Ok(entry.map(|v| v.value.clone()))
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> StateResult<()> {
        validate_key(key)?;

        debug!(tx_id = %self.tx_id, key = %key, len = value.len(), "put_state");
        self.lock()?.rwset.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> StateResult<Box<dyn StateIterator + '_>> {
        let mut sim = self.lock()?;
        if sim.open_iterators >= self.max_open_iterators {
            return Err(StateError::IteratorLimit {
                limit: self.max_open_iterators,
            });
        }

        let mut entries = VecDeque::new();
        let mut results = Vec::new();
        for (key, versioned) in range_entries(&self.snapshot, start_key, end_key)? {
            results.push(KeyVersion {
                key: key.clone(),
                version: versioned.version,
            });
            entries.push_back(KeyValue {
                key: key.clone(),
                value: versioned.value.clone(),
            });
        }

        sim.rwset.range_queries.push(RangeQueryInfo {
            start_key: start_key.to_string(),
            end_key: end_key.to_string(),
            results,
        });
        sim.open_iterators += 1;

        debug!(
            tx_id = %self.tx_id,
            start_key = %start_key,
            end_key = %end_key,
            entries = entries.len(),
            open_iterators = sim.open_iterators,
            "range iterator opened"
        );

        Ok(Box::new(MemoryIterator {
            entries,
            sim: &self.sim,
            closed: false,
        }))
    }
}

/// Cursor over a materialized slice of the transaction's snapshot.
///
/// Counts against the transaction's iterator limit until `close()` is called.
/// Dropping it without closing leaks that slot for the rest of the
/// transaction.
struct MemoryIterator<'a> {
    entries: VecDeque<KeyValue>,
    sim: &'a Mutex<Simulation>,
    closed: bool,
}

impl StateIterator for MemoryIterator<'_> {
    fn has_next(&self) -> bool {
        !self.closed && !self.entries.is_empty()
    }

    fn next_entry(&mut self) -> StateResult<KeyValue> {
        if self.closed {
            return Err(StateError::IteratorClosed);
        }
        self.entries.pop_front().ok_or(StateError::IteratorExhausted)
    }

    fn close(&mut self) -> StateResult<()> {
        if self.closed {
            return Err(StateError::IteratorClosed);
        }
        self.closed = true;
        self.entries.clear();

        let mut sim = lock_simulation(self.sim)?;
        sim.open_iterators = sim.open_iterators.saturating_sub(1);
        Ok(())
    }
}
