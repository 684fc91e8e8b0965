//! The world-state boundary the contract runs against.
//!
//! The host ledger hands every invocation a transaction-scoped handle that
//! implements `WorldState`. The contract never keeps the handle past the
//! call, never caches what it reads, and has no side effects other than
//! through it, so the host can re-execute or roll back an invocation freely.
//!
//! Ordering, endorsement, and commit are the host's business. Writes made
//! through a handle only become visible to others once the host commits the
//! enclosing transaction.

use logbook_contracts::{error::StateResult, state::KeyValue};

/// A transaction-scoped view of the contract's key-value namespace.
///
/// Keys are arbitrary non-empty strings, ordered byte-lexicographically.
pub trait WorldState: Send + Sync {
    /// Point lookup. `Ok(None)` means the key is absent, which is not an error.
    fn get_state(&self, key: &str) -> StateResult<Option<Vec<u8>>>;

    /// Unconditional upsert of `value` under `key`.
    fn put_state(&self, key: &str, value: Vec<u8>) -> StateResult<()>;

    /// Open a cursor over `[start_key, end_key)` in ascending key order.
    ///
    /// An empty `start_key` means "from the first key" and an empty `end_key`
    /// means "through the last key", so `("", "")` covers the whole
    /// namespace. The caller must `close()` the cursor on every path.
    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> StateResult<Box<dyn StateIterator + '_>>;
}

/// A range cursor returned by `WorldState::get_state_by_range`.
///
/// Cursors are finite and cannot be restarted. They hold host resources
/// until `close()` is called.
pub trait StateIterator: Send {
    /// Return true if `next_entry()` will yield another pair.
    fn has_next(&self) -> bool;

    /// Yield the next `(key, value)` pair.
    fn next_entry(&mut self) -> StateResult<KeyValue>;

    /// Release the cursor. Using it afterwards is an error.
    fn close(&mut self) -> StateResult<()>;
}
