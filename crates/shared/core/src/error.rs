//! Domain invariant errors
//!
//! Raised when a checked delta application would leave a record in an
//! illegal state. The mutation is rejected before anything is written.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("available_cash ({available}) cannot be greater than cash_amount ({total})")]
    AvailableCashExceedsTotal { available: Decimal, total: Decimal },

    #[error("available_cash ({0}) cannot be less than 0")]
    NegativeAvailableCash(Decimal),

    #[error("cash_amount ({0}) cannot be less than 0")]
    NegativeCash(Decimal),

    #[error("available_qty ({available}) cannot be greater than qty ({total})")]
    AvailableQtyExceedsTotal { available: Decimal, total: Decimal },

    #[error("available_qty ({0}) cannot be less than 0")]
    NegativeAvailableQty(Decimal),

    #[error("qty ({0}) cannot be less than 0")]
    NegativeQty(Decimal),
}
