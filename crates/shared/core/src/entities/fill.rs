use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OrderId;

/// Unique identifier for a fill
pub type FillId = Uuid;

/// Settlement state of a fill's proceeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryStatus {
    /// Proceeds still reserved, awaiting the delivery period
    NotDelivered,
    /// Proceeds released into the available balance/quantity
    Delivered,
}

/// An execution result reported by the venue for one order
///
/// Fills are append-only: once recorded, only `delivery_status` ever
/// changes (flipped by the settlement processor). Several fills may
/// reference the same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    pub id: FillId,
    pub order_id: OrderId,
    /// Quantity executed in this fill
    pub filled_qty: Decimal,
    /// Execution price
    pub price: Decimal,
    pub transaction_fee: Decimal,
    /// Quantity the venue canceled (the whole remainder, when non-zero)
    pub canceled_qty: Decimal,
    pub execution_time: DateTime<Utc>,
    pub delivery_status: DeliveryStatus,
    /// What settlement will release: the position delta for a buy fill,
    /// the cash delta for a sell fill
    pub delivery_amount: Decimal,
}

impl Fill {
    pub fn is_delivered(&self) -> bool {
        self.delivery_status == DeliveryStatus::Delivered
    }

    /// Gross traded value before fees
    pub fn gross_value(&self) -> Decimal {
        self.filled_qty * self.price
    }
}
