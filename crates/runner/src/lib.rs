//! Hermes Runner - Signal Loop Orchestration
//!
//! Wires the trading core to its collaborators and drives the live
//! cycle: pull a signal frame, translate it, persist the intents as
//! orders, submit each one as an independent task, and book venue fills
//! as they arrive.
//!
//! ## Architecture
//!
//! ```text
//!  SignalSource ──frame──► ┌───────────────────────────────┐
//!  PriceSource ──prices──► │          TradeLoop            │
//!                          │                               │
//!                          │  translate ─► persist orders  │
//!                          │        │                      │
//!                          │        ▼ one task per order   │
//!                          │  submit ──► venue.submit      │──► ExecutionVenue
//!                          │                               │
//!                          │  fill notices ─► apply_fill   │◄── mpsc<FillNotice>
//!                          └───────────────┬───────────────┘
//!                                          │
//!                                          ▼
//!                                     LedgerStore
//! ```
//!
//! A failed cycle is logged and the loop moves on; fill application and
//! settlement errors are logged loudly since they indicate ledger
//! corruption risks, never swallowed silently.

pub mod bootstrap;
pub mod feeds;
pub mod trade_loop;

// Re-export main types
pub use bootstrap::{RunnerConfig, TradingBootstrap};
pub use feeds::{ScriptedSignalSource, StaticPriceSource};
pub use trade_loop::TradeLoop;
