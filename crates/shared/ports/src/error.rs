use hermes_core::{DomainError, OrderId, OrderStatus};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by a [`crate::LedgerStore`] implementation
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("account {0} not found")]
    AccountNotFound(Uuid),

    #[error("position {0} not found")]
    PositionNotFound(Uuid),

    #[error("order {0} not found")]
    OrderNotFound(Uuid),

    #[error("fill {0} not found")]
    FillNotFound(Uuid),

    /// A write would have left a record in an illegal state; nothing
    /// was written.
    #[error("invariant violated: {0}")]
    Invariant(#[from] DomainError),

    /// A field failed range/shape validation on insert
    #[error("invalid value: {0}")]
    Validation(String),

    #[error("illegal order status transition {from:?} -> {to:?} for order {order_id}")]
    InvalidTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors raised by an [`crate::ExecutionVenue`] implementation
#[derive(Error, Debug)]
pub enum VenueError {
    #[error("venue rejected order {order_id}: {reason}")]
    Rejected { order_id: OrderId, reason: String },

    #[error("venue unavailable: {0}")]
    Unavailable(String),
}

pub type VenueResult<T> = Result<T, VenueError>;
