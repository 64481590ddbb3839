//! Hermes Core Domain
//!
//! Pure domain types for the Hermes trading core.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Ledger records
    Account,
    AccountId,
    CashDelta,
    DeliveryStatus,
    Fill,
    FillId,
    Order,
    OrderDirection,
    OrderId,
    // Signal interface types
    OrderIntent,
    OrderStatus,
    OrderType,
    Position,
    PositionId,
    PositionSide,
    QtyDelta,
    SignalFrame,
    SignalMode,
};
pub use error::DomainError;
pub use values::{Price, Quantity, Symbol, Timestamp};
