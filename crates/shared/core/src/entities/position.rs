use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::values::Symbol;

/// Unique identifier for a position
pub type PositionId = Uuid;

/// Position side - long (bought) or short (sold borrowed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            PositionSide::Long => PositionSide::Short,
            PositionSide::Short => PositionSide::Long,
        }
    }

    /// Returns +1 for long, -1 for short (for signed holdings)
    pub fn sign(&self) -> Decimal {
        match self {
            PositionSide::Long => Decimal::ONE,
            PositionSide::Short => Decimal::NEGATIVE_ONE,
        }
    }
}

/// A holding of one symbol on one side of the book
///
/// Quantities are always non-negative; the side carries the direction.
/// `available_qty` excludes amounts still awaiting delivery. There is at
/// most one position per (account, symbol, side) triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub account_id: Uuid,
    pub symbol: Symbol,
    pub side: PositionSide,
    /// Total quantity held
    pub qty: Decimal,
    /// Quantity not reserved by pending settlement
    pub available_qty: Decimal,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Position {
    /// Create an empty position (lazily opened at first order)
    pub fn new_with_time(
        account_id: Uuid,
        symbol: impl Into<Symbol>,
        side: PositionSide,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            symbol: symbol.into(),
            side,
            qty: Decimal::ZERO,
            available_qty: Decimal::ZERO,
            opened_at: at,
            updated_at: at,
        }
    }

    /// Apply a quantity delta, validating invariants first
    ///
    /// On error the position is left untouched.
    pub fn apply(&mut self, delta: &QtyDelta, at: DateTime<Utc>) -> Result<(), DomainError> {
        let qty = self.qty + delta.qty;
        let available_qty = self.available_qty + delta.available_qty;

        if available_qty > qty {
            return Err(DomainError::AvailableQtyExceedsTotal {
                available: available_qty,
                total: qty,
            });
        }
        if available_qty < Decimal::ZERO {
            return Err(DomainError::NegativeAvailableQty(available_qty));
        }
        if qty < Decimal::ZERO {
            return Err(DomainError::NegativeQty(qty));
        }

        self.qty = qty;
        self.available_qty = available_qty;
        self.updated_at = at;
        Ok(())
    }

    /// Quantity signed by side (positive = long, negative = short)
    pub fn signed_qty(&self) -> Decimal {
        self.side.sign() * self.qty
    }

    /// Available quantity signed by side
    pub fn signed_available_qty(&self) -> Decimal {
        self.side.sign() * self.available_qty
    }
}

/// Delta applied to a position's quantities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QtyDelta {
    pub qty: Decimal,
    pub available_qty: Decimal,
}

impl QtyDelta {
    /// Change total and available quantity by the same amount
    pub fn both(amount: Decimal) -> Self {
        Self {
            qty: amount,
            available_qty: amount,
        }
    }

    /// Change total quantity only (available stays reserved)
    pub fn total(amount: Decimal) -> Self {
        Self {
            qty: amount,
            available_qty: Decimal::ZERO,
        }
    }

    /// Change available quantity only (release from reservation)
    pub fn available(amount: Decimal) -> Self {
        Self {
            qty: Decimal::ZERO,
            available_qty: amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(side: PositionSide) -> Position {
        Position::new_with_time(Uuid::new_v4(), "000001", side, Utc::now())
    }

    #[test]
    fn test_new_position_is_empty() {
        let pos = position(PositionSide::Long);
        assert_eq!(pos.qty, Decimal::ZERO);
        assert_eq!(pos.available_qty, Decimal::ZERO);
    }

    #[test]
    fn test_buy_then_deliver() {
        let mut pos = position(PositionSide::Long);

        // fill books into qty only
        pos.apply(&QtyDelta::total(dec!(100)), Utc::now()).unwrap();
        assert_eq!(pos.qty, dec!(100));
        assert_eq!(pos.available_qty, Decimal::ZERO);

        // settlement releases the reserved amount
        pos.apply(&QtyDelta::available(dec!(100)), Utc::now())
            .unwrap();
        assert_eq!(pos.available_qty, dec!(100));
    }

    #[test]
    fn test_available_cannot_exceed_qty() {
        let mut pos = position(PositionSide::Long);
        pos.apply(&QtyDelta::total(dec!(50)), Utc::now()).unwrap();

        let err = pos
            .apply(&QtyDelta::available(dec!(51)), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::AvailableQtyExceedsTotal { .. }));
        assert_eq!(pos.available_qty, Decimal::ZERO);
    }

    #[test]
    fn test_qty_cannot_go_negative() {
        let mut pos = position(PositionSide::Long);
        pos.apply(&QtyDelta::both(dec!(10)), Utc::now()).unwrap();

        let err = pos
            .apply(&QtyDelta::both(dec!(-11)), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::NegativeAvailableQty(_)));
        assert_eq!(pos.qty, dec!(10));
    }

    #[test]
    fn test_signed_quantities() {
        let mut long = position(PositionSide::Long);
        long.apply(&QtyDelta::both(dec!(30)), Utc::now()).unwrap();
        assert_eq!(long.signed_qty(), dec!(30));

        let mut short = position(PositionSide::Short);
        short.apply(&QtyDelta::both(dec!(30)), Utc::now()).unwrap();
        assert_eq!(short.signed_qty(), dec!(-30));
        assert_eq!(short.signed_available_qty(), dec!(-30));
    }
}
