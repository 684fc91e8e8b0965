//! # logbook-memory
//!
//! An in-process ledger substrate for running and testing the logbook
//! contract.
//!
//! ## Overview
//!
//! [`MemoryLedger`] keeps committed, versioned world state per contract
//! namespace. [`MemoryLedger::begin`] hands out a [`MemoryTransaction`], which
//! implements [`WorldState`](logbook_core::traits::WorldState) against a
//! snapshot and records a [`ReadWriteSet`]. [`MemoryLedger::commit`] re-checks
//! that set against the latest state and applies it, or rejects it as a whole.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use logbook_core::LogContract;
//! use logbook_memory::MemoryLedger;
//!
//! let ledger = MemoryLedger::new();
//! let tx = ledger.begin("logcc")?;
//! LogContract::new().init_ledger(&tx)?;
//! ledger.commit(tx)?;
//! ```

pub mod config;
pub mod ledger;
pub mod rwset;
pub mod transaction;

pub use config::LedgerConfig;
pub use ledger::{CommitReceipt, MemoryLedger};
pub use rwset::{KeyVersion, RangeQueryInfo, ReadWriteSet};
pub use transaction::MemoryTransaction;

// ── Tests ─────────────────────────────────────────────────────────────────────
