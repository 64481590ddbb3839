//! Hermes Trader
//!
//! The trading core proper: translates portfolio signals into orders,
//! drives the order state machine against the ledger, and settles fill
//! proceeds after the configured delivery lag.
//!
//! ## Architecture
//!
//! ```text
//! Strategy ──► SignalFrame ──► ┌────────────────────────────────────┐
//!                              │            Trader                  │
//!                              │  ┌─────────────────────────────┐   │
//!                              │  │   Signal Translator         │   │
//!                              │  │   - PT / PS / VS parsing    │   │
//!                              │  │   - cash rationing          │   │
//!                              │  │   - itemization             │   │
//!                              │  └──────────────┬──────────────┘   │
//!                              │                 │ OrderIntents     │
//!                              │  ┌──────────────▼──────────────┐   │
//!                              │  │   Order Lifecycle           │   │
//!                              │  │   - persist as `created`    │   │
//!                              │  │   - submission gating       │   │
//!                              │  │   - fill application        │   │
//!                              │  └──────────────┬──────────────┘   │
//!                              │                 │ ledger writes    │
//!                              │  ┌──────────────▼──────────────┐   │
//!                              │  │   Settlement Processor      │   │
//!                              │  │   - delivery day-counts     │   │
//!                              │  │   - available release       │   │
//!                              │  └─────────────────────────────┘   │
//!                              └────────────────────────────────────┘
//!                                               │ tickets
//!                                               ▼
//!                                        Execution Venue
//! ```
//!
//! All state lives behind the [`hermes_ports::LedgerStore`] port; the
//! components here are constructed with explicit handles (ledger, clock,
//! config) and hold no global state.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod settlement;
pub mod translator;

// Re-export main types
pub use config::TraderConfig;
pub use error::{TraderError, TraderResult};
pub use lifecycle::OrderLifecycle;
pub use settlement::SettlementProcessor;
pub use translator::SignalTranslator;
