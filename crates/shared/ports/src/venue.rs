//! Execution venue port
//!
//! The venue accepts submitted orders and reports executions
//! asynchronously. Submission resolves once the venue acknowledges the
//! ticket; fills arrive later as [`FillNotice`]s on whatever channel the
//! venue implementation was wired with. The venue - not the trading
//! core - is authoritative for whether an order actually executes.

use async_trait::async_trait;
use hermes_core::{OrderDirection, OrderId, PositionSide, Symbol, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::VenueResult;

/// What the venue needs to know about a submitted order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTicket {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: PositionSide,
    pub direction: OrderDirection,
    pub qty: Decimal,
    pub price: Decimal,
}

/// Asynchronous execution report from the venue
///
/// `canceled_qty > 0` means the venue canceled the order's entire
/// remainder (and must equal it exactly).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillNotice {
    pub order_id: OrderId,
    pub filled_qty: Decimal,
    pub price: Decimal,
    pub transaction_fee: Decimal,
    pub canceled_qty: Decimal,
    pub execution_time: Timestamp,
}

/// Port to the execution venue / broker adapter
#[async_trait]
pub trait ExecutionVenue: Send + Sync {
    /// Submit an order; resolves on acknowledgment, not execution
    async fn submit_order(&self, ticket: &OrderTicket) -> VenueResult<()>;
}
