use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PositionId;

/// Unique identifier for an order
pub type OrderId = Uuid;

/// Trade direction relative to the position the order targets
///
/// A buy increases the position (also when the position is short - buying
/// on the short side opens or extends it), a sell reduces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Buy,
    Sell,
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
}

/// Order lifecycle status
///
/// Transitions move strictly forward through the state machine:
///
/// ```text
/// created --submit--> submitted --fill(partial)--> partial-filled --fill(rest)--> filled
///    |                     |                              |
///    +--cancel------------>canceled<----------------------+
/// submitted --fill(full)--------------------------------> filled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Persisted but not yet handed to the venue
    Created,
    /// Live at the venue, no fills yet
    Submitted,
    /// Some quantity filled, remainder outstanding
    PartialFilled,
    /// Fully filled
    Filled,
    /// Remainder canceled by the venue
    Canceled,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Canceled)
    }

    /// Returns true if the order can accept fills
    pub fn is_fillable(&self) -> bool {
        matches!(self, OrderStatus::Submitted | OrderStatus::PartialFilled)
    }

    /// Returns true if `self -> to` is a legal transition
    pub fn can_transition(self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (Created, Submitted)
                | (Created, Canceled)
                | (Submitted, PartialFilled)
                | (Submitted, Filled)
                | (Submitted, Canceled)
                | (PartialFilled, Filled)
                | (PartialFilled, Canceled)
        )
    }
}

/// A discrete order against one position
///
/// Immutable once created except for `status`, `submitted_time`, and the
/// quantity adjustment allowed at submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// The position this order trades against
    pub position_id: PositionId,
    pub direction: OrderDirection,
    pub order_type: OrderType,
    pub qty: Decimal,
    pub price: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Set when the order moves to `submitted`
    pub submitted_time: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a new order in `created` state
    pub fn new_with_time(
        position_id: PositionId,
        direction: OrderDirection,
        order_type: OrderType,
        qty: Decimal,
        price: Decimal,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position_id,
            direction,
            order_type,
            qty,
            price,
            status: OrderStatus::Created,
            created_at: at,
            submitted_time: None,
        }
    }

    /// Notional value at the order price
    pub fn notional(&self) -> Decimal {
        self.qty * self.price
    }
}
