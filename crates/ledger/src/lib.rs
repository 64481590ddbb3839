//! Hermes Ledger
//!
//! In-memory implementation of the [`hermes_ports::LedgerStore`] port:
//! four concurrent tables (accounts, positions, orders, fills) with
//! atomic per-record delta application. Every write re-reads the current
//! record, applies the delta, re-validates the field invariants, and
//! only then commits - a failed check raises and leaves the table
//! untouched.
//!
//! Position uniqueness per (account, symbol, side) is guaranteed by a
//! dedicated index map, so concurrent get-or-create calls converge on
//! one record.

mod memory;

pub use memory::MemoryLedger;
