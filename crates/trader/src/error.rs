//! Trading core errors
//!
//! Validation and state-machine problems are fatal to the call that hit
//! them; the signal loop logs them and moves to the next cycle. Ledger
//! invariant violations pass through unchanged - they are never
//! swallowed.

use hermes_core::{OrderId, OrderStatus, Symbol};
use hermes_ports::LedgerError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraderError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("signal frame carries {values} values for {symbols} symbols")]
    FrameLengthMismatch { symbols: usize, values: usize },

    #[error("{what} carries {got} entries, expected {expected}")]
    InputLengthMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("price for {symbol} must be positive, got {price}")]
    InvalidPrice { symbol: Symbol, price: Decimal },

    #[error("no price available for {0}")]
    MissingPrice(Symbol),

    #[error("total equity must be positive, got {0}")]
    NonPositiveEquity(Decimal),

    #[error("{symbol} holds both a long and a short position")]
    ConflictingHoldings { symbol: Symbol },

    #[error("order {order_id} in status {status:?} cannot accept fills")]
    OrderNotFillable {
        order_id: OrderId,
        status: OrderStatus,
    },

    #[error(
        "canceled qty {canceled} does not match remaining qty {remaining} for order {order_id}"
    )]
    CanceledQtyMismatch {
        order_id: OrderId,
        canceled: Decimal,
        remaining: Decimal,
    },

    #[error("filled qty {filled} exceeds remaining qty {remaining} for order {order_id}")]
    FillExceedsRemaining {
        order_id: OrderId,
        filled: Decimal,
        remaining: Decimal,
    },

    /// Raised instead of the advisory warning when `strict_submission`
    /// is on
    #[error(
        "insufficient {resource} for order {order_id}: required {required}, available {available}"
    )]
    InsufficientResources {
        resource: &'static str,
        order_id: OrderId,
        required: Decimal,
        available: Decimal,
    },
}

pub type TraderResult<T> = Result<T, TraderError>;
