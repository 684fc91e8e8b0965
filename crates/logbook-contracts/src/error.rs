//! Error taxonomy for the logbook contract.
//!
//! Contract operations return `LogbookResult<T>`. Codec and world-state
//! failures are wrapped with the operation name and key that triggered them,
//! and the original cause stays reachable through `Error::source()`.

use thiserror::Error;

/// Failure converting a `LogRecord` to or from its canonical bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The record could not be serialized.
    #[error("failed to encode log: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    /// The stored bytes are not a well-formed log.
    #[error("malformed log bytes: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reported by the world-state store behind a transaction handle.
#[derive(Debug, Error)]
pub enum StateError {
    /// The key is empty or falls in a reserved range.
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// The transaction already holds the maximum number of open iterators.
    #[error("iterator limit reached: at most {limit} iterators may be open per transaction")]
    IteratorLimit { limit: usize },

    /// `next` was called on a cursor with no remaining entries.
    #[error("iterator exhausted")]
    IteratorExhausted,

    /// The cursor was used after `close`.
    #[error("iterator already closed")]
    IteratorClosed,

    /// The backing store could not serve the request.
    #[error("world state unavailable: {reason}")]
    Unavailable { reason: String },

    /// A key read during simulation was changed by a later commit.
    #[error("transaction {tx_id} invalidated: key '{key}' changed since it was read")]
    MvccReadConflict { tx_id: String, key: String },

    /// A range read during simulation would now return different entries.
    #[error("transaction {tx_id} invalidated: range ['{start_key}', '{end_key}') changed since it was read")]
    PhantomRead {
        tx_id: String,
        start_key: String,
        end_key: String,
    },
}

/// Convenience alias for world-state calls.
pub type StateResult<T> = Result<T, StateError>;

/// The unified error type returned by every contract operation.
#[derive(Debug, Error)]
pub enum LogbookError {
    /// A record could not be encoded, or stored bytes could not be decoded.
    ///
    /// Fatal to the enclosing operation; never retried by the contract.
    #[error("{operation} failed for log '{key}': {source}")]
    Codec {
        operation: &'static str,
        key: String,
        #[source]
        source: CodecError,
    },

    /// `create_log` was asked to write an `id` that already exists.
    #[error("the log {id} already exists")]
    Conflict { id: String },

    /// No log is stored under `id`.
    #[error("the log {id} does not exist")]
    NotFound { id: String },

    /// The world-state store failed. The host decides whether to retry the
    /// whole transaction.
    #[error("{operation} failed on world state key '{key}': {source}")]
    Store {
        operation: &'static str,
        key: String,
        #[source]
        source: StateError,
    },

    /// A configuration document is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the logbook crates.
pub type LogbookResult<T> = Result<T, LogbookError>;
