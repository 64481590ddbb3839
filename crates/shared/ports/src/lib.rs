//! Hermes Ports
//!
//! Port definitions (traits) for the Hermes trading core.
//! These define the boundaries between domain logic and infrastructure:
//! the record store, the price feed, the strategy engine, and the
//! execution venue are all reached through the traits in this crate.

mod clock;
mod error;
mod ledger;
mod pricing;
mod signal;
mod venue;

pub use clock::Clock;
pub use error::{LedgerError, LedgerResult, VenueError, VenueResult};
pub use ledger::{LedgerStore, NewFill, NewOrder, OrderFilter};
pub use pricing::PriceSource;
pub use signal::SignalSource;
pub use venue::{ExecutionVenue, FillNotice, OrderTicket};
