//! Ledger store port
//!
//! Typed accessors over the four record tables: accounts, positions,
//! orders, fills. Implementations must make every update atomic per
//! record: re-read the current row, apply the delta, re-validate the
//! field invariants, and only then write. A failed check raises and the
//! write does not occur.

use hermes_core::{
    Account, AccountId, CashDelta, Fill, FillId, Order, OrderDirection, OrderId, OrderStatus,
    OrderType, Position, PositionId, PositionSide, QtyDelta, Symbol, Timestamp,
};
use rust_decimal::Decimal;

use crate::error::LedgerResult;

/// A new order row, prior to id assignment
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub position_id: PositionId,
    pub direction: OrderDirection,
    pub order_type: OrderType,
    pub qty: Decimal,
    pub price: Decimal,
}

/// A new fill row, prior to id assignment
///
/// Delivery status starts at not-delivered; `delivery_amount` is computed
/// by the caller (position delta for buys, cash delta for sells).
#[derive(Debug, Clone)]
pub struct NewFill {
    pub order_id: OrderId,
    pub filled_qty: Decimal,
    pub price: Decimal,
    pub transaction_fee: Decimal,
    pub canceled_qty: Decimal,
    pub execution_time: Timestamp,
    pub delivery_amount: Decimal,
}

/// Predicate for order queries; `None` fields match anything
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub account_id: Option<AccountId>,
    pub symbol: Option<Symbol>,
    pub side: Option<PositionSide>,
    pub direction: Option<OrderDirection>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Match every order of one account
    pub fn account(account_id: AccountId) -> Self {
        Self {
            account_id: Some(account_id),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<Symbol>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_direction(mut self, direction: OrderDirection) -> Self {
        self.direction = Some(direction);
        self
    }
}

/// Port to the record store backing the trading core
pub trait LedgerStore: Send + Sync {
    // ---- accounts ----

    /// Create an account; `cash_amount` must be positive and starts fully
    /// available.
    fn create_account(
        &self,
        owner: &str,
        cash_amount: Decimal,
        at: Timestamp,
    ) -> LedgerResult<AccountId>;

    fn account(&self, id: AccountId) -> LedgerResult<Account>;

    /// Apply a balance delta; returns the updated record
    fn update_account_balance(&self, id: AccountId, delta: CashDelta) -> LedgerResult<Account>;

    // ---- positions ----

    /// Return the position id for (account, symbol, side), creating an
    /// empty position if none exists yet.
    fn get_or_create_position(
        &self,
        account_id: AccountId,
        symbol: &str,
        side: PositionSide,
        at: Timestamp,
    ) -> LedgerResult<PositionId>;

    fn position(&self, id: PositionId) -> LedgerResult<Position>;

    fn find_position(
        &self,
        account_id: AccountId,
        symbol: &str,
        side: PositionSide,
    ) -> LedgerResult<Option<Position>>;

    fn account_positions(&self, account_id: AccountId) -> LedgerResult<Vec<Position>>;

    /// Apply a quantity delta; returns the updated record
    fn update_position(
        &self,
        id: PositionId,
        delta: QtyDelta,
        at: Timestamp,
    ) -> LedgerResult<Position>;

    // ---- orders ----

    /// Persist a new order in `created` state; qty and price must be
    /// positive.
    fn record_order(&self, order: NewOrder, at: Timestamp) -> LedgerResult<OrderId>;

    fn order(&self, id: OrderId) -> LedgerResult<Order>;

    fn orders(&self, filter: &OrderFilter) -> LedgerResult<Vec<Order>>;

    /// Move an order from `created` to `submitted`, stamping the
    /// submission time. `qty` optionally adjusts the order quantity -
    /// the only point in the lifecycle where it may change.
    fn mark_submitted(
        &self,
        id: OrderId,
        at: Timestamp,
        qty: Option<Decimal>,
    ) -> LedgerResult<Order>;

    /// Advance an order's status; illegal transitions raise
    fn transition_order(&self, id: OrderId, status: OrderStatus) -> LedgerResult<Order>;

    // ---- fills ----

    /// Append a fill. Fills are immutable once recorded, except for the
    /// delivery flag.
    fn record_fill(&self, fill: NewFill) -> LedgerResult<FillId>;

    fn fill(&self, id: FillId) -> LedgerResult<Fill>;

    fn fills_for_order(&self, order_id: OrderId) -> LedgerResult<Vec<Fill>>;

    /// All fills still awaiting delivery, oldest first
    fn undelivered_fills(&self) -> LedgerResult<Vec<Fill>>;

    /// Flip a fill to delivered; returns the updated record
    fn mark_fill_delivered(&self, id: FillId) -> LedgerResult<Fill>;
}
