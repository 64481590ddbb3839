use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for an account
pub type AccountId = Uuid;

/// A trading account
///
/// `cash_amount` is the total cash held (settled plus reserved);
/// `available_cash` excludes amounts still awaiting delivery and is the
/// only part new buy orders may draw on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Owner of the account (user name or agent id)
    pub owner: String,
    /// Total cash
    pub cash_amount: Decimal,
    /// Cash not reserved by pending settlement
    pub available_cash: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with all cash immediately available
    pub fn new_with_time(owner: impl Into<String>, cash_amount: Decimal, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            cash_amount,
            available_cash: cash_amount,
            created_at: at,
        }
    }

    /// Apply a balance delta, validating invariants first
    ///
    /// On error the account is left untouched.
    pub fn apply(&mut self, delta: &CashDelta) -> Result<(), DomainError> {
        let cash_amount = self.cash_amount + delta.cash_amount;
        let available_cash = self.available_cash + delta.available_cash;

        if available_cash > cash_amount {
            return Err(DomainError::AvailableCashExceedsTotal {
                available: available_cash,
                total: cash_amount,
            });
        }
        if available_cash < Decimal::ZERO {
            return Err(DomainError::NegativeAvailableCash(available_cash));
        }
        if cash_amount < Decimal::ZERO {
            return Err(DomainError::NegativeCash(cash_amount));
        }

        self.cash_amount = cash_amount;
        self.available_cash = available_cash;
        Ok(())
    }
}

/// Delta applied to an account's balances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashDelta {
    pub cash_amount: Decimal,
    pub available_cash: Decimal,
}

impl CashDelta {
    /// Change total and available cash by the same amount
    pub fn both(amount: Decimal) -> Self {
        Self {
            cash_amount: amount,
            available_cash: amount,
        }
    }

    /// Change total cash only (available stays reserved)
    pub fn total(amount: Decimal) -> Self {
        Self {
            cash_amount: amount,
            available_cash: Decimal::ZERO,
        }
    }

    /// Change available cash only (release from reservation)
    pub fn available(amount: Decimal) -> Self {
        Self {
            cash_amount: Decimal::ZERO,
            available_cash: amount,
        }
    }
}
