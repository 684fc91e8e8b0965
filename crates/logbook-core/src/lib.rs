//! # logbook-core
//!
//! The deterministic record-management contract for logbook entries.
//!
//! This crate provides:
//! - The world-state seam (`WorldState`, `StateIterator`) the host implements
//! - `LogContract`, the stateless record manager
//! - `LogScan`, a lazy scan that always releases its cursor
//!
//! ## Usage
//!
//! ```rust,ignore
//! use logbook_core::{LogContract, traits::WorldState};
//!
//! let contract = LogContract::new();
//! contract.init_ledger(&tx)?;
//! let logs = contract.get_all_logs(&tx)?;
//! ```

pub mod contract;
pub mod scan;
pub mod seed;
pub mod traits;

pub use contract::LogContract;
pub use scan::LogScan;
pub use seed::seed_logs;

// ── Tests ─────────────────────────────────────────────────────────────────────
