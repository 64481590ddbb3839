//! DashMap-backed ledger tables

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;

use hermes_core::{
    Account, AccountId, CashDelta, DeliveryStatus, Fill, FillId, Order, OrderId, OrderStatus,
    Position, PositionId, PositionSide, QtyDelta, Symbol, Timestamp,
};
use hermes_ports::{LedgerError, LedgerResult, LedgerStore, NewFill, NewOrder, OrderFilter};

/// In-memory record store over the four ledger tables
///
/// Shard-level entry locks make each record update atomic; multi-record
/// consistency (e.g. order + account + position on a fill) is the order
/// lifecycle's job, which serializes per account.
#[derive(Default)]
pub struct MemoryLedger {
    accounts: DashMap<AccountId, Account>,
    positions: DashMap<PositionId, Position>,
    /// Uniqueness index: (account, symbol, side) -> position id
    position_index: DashMap<(AccountId, Symbol, PositionSide), PositionId>,
    orders: DashMap<OrderId, Order>,
    fills: DashMap<FillId, Fill>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedger {
    // ---- accounts ----

    fn create_account(
        &self,
        owner: &str,
        cash_amount: Decimal,
        at: Timestamp,
    ) -> LedgerResult<AccountId> {
        if cash_amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "initial cash_amount must be positive, got {cash_amount}"
            )));
        }
        let account = Account::new_with_time(owner, cash_amount, at);
        let id = account.id;
        self.accounts.insert(id, account);
        log::debug!("created account {id} for '{owner}' with cash {cash_amount}");
        Ok(id)
    }

    fn account(&self, id: AccountId) -> LedgerResult<Account> {
        self.accounts
            .get(&id)
            .map(|a| a.clone())
            .ok_or(LedgerError::AccountNotFound(id))
    }

    fn update_account_balance(&self, id: AccountId, delta: CashDelta) -> LedgerResult<Account> {
        let mut entry = self
            .accounts
            .get_mut(&id)
            .ok_or(LedgerError::AccountNotFound(id))?;
        let mut updated = entry.clone();
        updated.apply(&delta)?;
        *entry = updated.clone();
        Ok(updated)
    }

    // ---- positions ----

    fn get_or_create_position(
        &self,
        account_id: AccountId,
        symbol: &str,
        side: PositionSide,
        at: Timestamp,
    ) -> LedgerResult<PositionId> {
        // positions must never reference a missing account
        self.account(account_id)?;

        let key = (account_id, symbol.to_string(), side);
        match self.position_index.entry(key) {
            Entry::Occupied(existing) => Ok(*existing.get()),
            Entry::Vacant(vacant) => {
                let position = Position::new_with_time(account_id, symbol, side, at);
                let id = position.id;
                self.positions.insert(id, position);
                vacant.insert(id);
                log::debug!("opened {side:?} position {id} for {symbol} on account {account_id}");
                Ok(id)
            }
        }
    }

    fn position(&self, id: PositionId) -> LedgerResult<Position> {
        self.positions
            .get(&id)
            .map(|p| p.clone())
            .ok_or(LedgerError::PositionNotFound(id))
    }

    fn find_position(
        &self,
        account_id: AccountId,
        symbol: &str,
        side: PositionSide,
    ) -> LedgerResult<Option<Position>> {
        let key = (account_id, symbol.to_string(), side);
        match self.position_index.get(&key) {
            Some(id) => self.position(*id).map(Some),
            None => Ok(None),
        }
    }

    fn account_positions(&self, account_id: AccountId) -> LedgerResult<Vec<Position>> {
        Ok(self
            .positions
            .iter()
            .filter(|p| p.account_id == account_id)
            .map(|p| p.clone())
            .collect())
    }

    fn update_position(
        &self,
        id: PositionId,
        delta: QtyDelta,
        at: Timestamp,
    ) -> LedgerResult<Position> {
        let mut entry = self
            .positions
            .get_mut(&id)
            .ok_or(LedgerError::PositionNotFound(id))?;
        let mut updated = entry.clone();
        updated.apply(&delta, at)?;
        *entry = updated.clone();
        Ok(updated)
    }

    // ---- orders ----

    fn record_order(&self, order: NewOrder, at: Timestamp) -> LedgerResult<OrderId> {
        if order.qty <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "order qty must be positive, got {}",
                order.qty
            )));
        }
        if order.price <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "order price must be positive, got {}",
                order.price
            )));
        }
        // orders must never reference a missing position
        self.position(order.position_id)?;

        let order = Order::new_with_time(
            order.position_id,
            order.direction,
            order.order_type,
            order.qty,
            order.price,
            at,
        );
        let id = order.id;
        self.orders.insert(id, order);
        Ok(id)
    }

    fn order(&self, id: OrderId) -> LedgerResult<Order> {
        self.orders
            .get(&id)
            .map(|o| o.clone())
            .ok_or(LedgerError::OrderNotFound(id))
    }

    fn orders(&self, filter: &OrderFilter) -> LedgerResult<Vec<Order>> {
        let mut matched = Vec::new();
        for order in self.orders.iter() {
            if filter.direction.is_some_and(|d| order.direction != d) {
                continue;
            }
            if filter.status.is_some_and(|s| order.status != s) {
                continue;
            }
            // account, symbol, and side live on the linked position
            if filter.account_id.is_some() || filter.symbol.is_some() || filter.side.is_some() {
                let position = self.position(order.position_id)?;
                if filter.account_id.is_some_and(|a| position.account_id != a) {
                    continue;
                }
                if filter
                    .symbol
                    .as_ref()
                    .is_some_and(|symbol| position.symbol != *symbol)
                {
                    continue;
                }
                if filter.side.is_some_and(|s| position.side != s) {
                    continue;
                }
            }
            matched.push(order.clone());
        }
        matched.sort_by_key(|o| o.created_at);
        Ok(matched)
    }

    fn mark_submitted(
        &self,
        id: OrderId,
        at: Timestamp,
        qty: Option<Decimal>,
    ) -> LedgerResult<Order> {
        if let Some(qty) = qty {
            if qty <= Decimal::ZERO {
                return Err(LedgerError::Validation(format!(
                    "submission qty must be positive, got {qty}"
                )));
            }
        }

        let mut entry = self
            .orders
            .get_mut(&id)
            .ok_or(LedgerError::OrderNotFound(id))?;
        if !entry.status.can_transition(OrderStatus::Submitted) {
            return Err(LedgerError::InvalidTransition {
                order_id: id,
                from: entry.status,
                to: OrderStatus::Submitted,
            });
        }
        entry.status = OrderStatus::Submitted;
        entry.submitted_time = Some(at);
        if let Some(qty) = qty {
            entry.qty = qty;
        }
        Ok(entry.clone())
    }

    fn transition_order(&self, id: OrderId, status: OrderStatus) -> LedgerResult<Order> {
        let mut entry = self
            .orders
            .get_mut(&id)
            .ok_or(LedgerError::OrderNotFound(id))?;
        if !entry.status.can_transition(status) {
            return Err(LedgerError::InvalidTransition {
                order_id: id,
                from: entry.status,
                to: status,
            });
        }
        entry.status = status;
        Ok(entry.clone())
    }

    // ---- fills ----

    fn record_fill(&self, fill: NewFill) -> LedgerResult<FillId> {
        if fill.filled_qty < Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "filled_qty cannot be negative, got {}",
                fill.filled_qty
            )));
        }
        if fill.price < Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "fill price cannot be negative, got {}",
                fill.price
            )));
        }
        if fill.transaction_fee < Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "transaction_fee cannot be negative, got {}",
                fill.transaction_fee
            )));
        }
        if fill.canceled_qty < Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "canceled_qty cannot be negative, got {}",
                fill.canceled_qty
            )));
        }
        if fill.filled_qty + fill.canceled_qty <= Decimal::ZERO {
            return Err(LedgerError::Validation(
                "fill must carry a filled or canceled quantity".to_string(),
            ));
        }
        // fills must never reference a missing order
        self.order(fill.order_id)?;

        let fill = Fill {
            id: uuid::Uuid::new_v4(),
            order_id: fill.order_id,
            filled_qty: fill.filled_qty,
            price: fill.price,
            transaction_fee: fill.transaction_fee,
            canceled_qty: fill.canceled_qty,
            execution_time: fill.execution_time,
            delivery_status: DeliveryStatus::NotDelivered,
            delivery_amount: fill.delivery_amount,
        };
        let id = fill.id;
        self.fills.insert(id, fill);
        Ok(id)
    }

    fn fill(&self, id: FillId) -> LedgerResult<Fill> {
        self.fills
            .get(&id)
            .map(|f| f.clone())
            .ok_or(LedgerError::FillNotFound(id))
    }

    fn fills_for_order(&self, order_id: OrderId) -> LedgerResult<Vec<Fill>> {
        let mut fills: Vec<Fill> = self
            .fills
            .iter()
            .filter(|f| f.order_id == order_id)
            .map(|f| f.clone())
            .collect();
        fills.sort_by_key(|f| f.execution_time);
        Ok(fills)
    }

    fn undelivered_fills(&self) -> LedgerResult<Vec<Fill>> {
        let mut fills: Vec<Fill> = self
            .fills
            .iter()
            .filter(|f| f.delivery_status == DeliveryStatus::NotDelivered)
            .map(|f| f.clone())
            .collect();
        fills.sort_by_key(|f| f.execution_time);
        Ok(fills)
    }

    fn mark_fill_delivered(&self, id: FillId) -> LedgerResult<Fill> {
        let mut entry = self
            .fills
            .get_mut(&id)
            .ok_or(LedgerError::FillNotFound(id))?;
        entry.delivery_status = DeliveryStatus::Delivered;
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hermes_core::{OrderDirection, OrderType};
    use rust_decimal_macros::dec;

    fn ledger_with_account() -> (MemoryLedger, AccountId) {
        let ledger = MemoryLedger::new();
        let account_id = ledger
            .create_account("tester", dec!(100000), Utc::now())
            .unwrap();
        (ledger, account_id)
    }

    fn recorded_order(ledger: &MemoryLedger, account_id: AccountId) -> OrderId {
        let position_id = ledger
            .get_or_create_position(account_id, "000001", PositionSide::Long, Utc::now())
            .unwrap();
        ledger
            .record_order(
                NewOrder {
                    position_id,
                    direction: OrderDirection::Buy,
                    order_type: OrderType::Market,
                    qty: dec!(100),
                    price: dec!(10),
                },
                Utc::now(),
            )
            .unwrap()
    }

    #[test]
    fn test_create_account_rejects_non_positive_cash() {
        let ledger = MemoryLedger::new();
        assert!(matches!(
            ledger.create_account("t", dec!(0), Utc::now()),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            ledger.create_account("t", dec!(-1), Utc::now()),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_get_or_create_position_is_idempotent() {
        let (ledger, account_id) = ledger_with_account();

        let first = ledger
            .get_or_create_position(account_id, "000001", PositionSide::Long, Utc::now())
            .unwrap();
        let second = ledger
            .get_or_create_position(account_id, "000001", PositionSide::Long, Utc::now())
            .unwrap();
        assert_eq!(first, second);

        // the other side is a distinct position
        let short = ledger
            .get_or_create_position(account_id, "000001", PositionSide::Short, Utc::now())
            .unwrap();
        assert_ne!(first, short);
    }

    #[test]
    fn test_position_requires_account() {
        let ledger = MemoryLedger::new();
        let missing = uuid::Uuid::new_v4();
        assert!(matches!(
            ledger.get_or_create_position(missing, "000001", PositionSide::Long, Utc::now()),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_failed_update_leaves_record_untouched() {
        let (ledger, account_id) = ledger_with_account();

        let err = ledger
            .update_account_balance(account_id, CashDelta::available(dec!(1)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Invariant(_)));

        let account = ledger.account(account_id).unwrap();
        assert_eq!(account.cash_amount, dec!(100000));
        assert_eq!(account.available_cash, dec!(100000));
    }

    #[test]
    fn test_record_order_validation() {
        let (ledger, account_id) = ledger_with_account();
        let position_id = ledger
            .get_or_create_position(account_id, "000001", PositionSide::Long, Utc::now())
            .unwrap();

        let bad_qty = NewOrder {
            position_id,
            direction: OrderDirection::Buy,
            order_type: OrderType::Market,
            qty: dec!(0),
            price: dec!(10),
        };
        assert!(matches!(
            ledger.record_order(bad_qty, Utc::now()),
            Err(LedgerError::Validation(_))
        ));

        let bad_price = NewOrder {
            position_id,
            direction: OrderDirection::Buy,
            order_type: OrderType::Market,
            qty: dec!(10),
            price: dec!(0),
        };
        assert!(matches!(
            ledger.record_order(bad_price, Utc::now()),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_order_state_machine_enforced() {
        let (ledger, account_id) = ledger_with_account();
        let order_id = recorded_order(&ledger, account_id);

        // created -> filled is not reachable directly
        assert!(matches!(
            ledger.transition_order(order_id, OrderStatus::Filled),
            Err(LedgerError::InvalidTransition { .. })
        ));

        let order = ledger.mark_submitted(order_id, Utc::now(), None).unwrap();
        assert_eq!(order.status, OrderStatus::Submitted);
        assert!(order.submitted_time.is_some());

        // double submission is illegal at the store level
        assert!(matches!(
            ledger.mark_submitted(order_id, Utc::now(), None),
            Err(LedgerError::InvalidTransition { .. })
        ));

        ledger
            .transition_order(order_id, OrderStatus::PartialFilled)
            .unwrap();
        ledger
            .transition_order(order_id, OrderStatus::Filled)
            .unwrap();

        // terminal states accept nothing further
        assert!(matches!(
            ledger.transition_order(order_id, OrderStatus::Canceled),
            Err(LedgerError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_submission_qty_adjustment() {
        let (ledger, account_id) = ledger_with_account();
        let order_id = recorded_order(&ledger, account_id);

        let order = ledger
            .mark_submitted(order_id, Utc::now(), Some(dec!(60)))
            .unwrap();
        assert_eq!(order.qty, dec!(60));
    }

    #[test]
    fn test_record_fill_validation() {
        let (ledger, account_id) = ledger_with_account();
        let order_id = recorded_order(&ledger, account_id);

        let vacuous = NewFill {
            order_id,
            filled_qty: dec!(0),
            price: dec!(10),
            transaction_fee: dec!(0),
            canceled_qty: dec!(0),
            execution_time: Utc::now(),
            delivery_amount: dec!(0),
        };
        assert!(matches!(
            ledger.record_fill(vacuous),
            Err(LedgerError::Validation(_))
        ));

        let negative_fee = NewFill {
            order_id,
            filled_qty: dec!(10),
            price: dec!(10),
            transaction_fee: dec!(-1),
            canceled_qty: dec!(0),
            execution_time: Utc::now(),
            delivery_amount: dec!(10),
        };
        assert!(matches!(
            ledger.record_fill(negative_fee),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_undelivered_scan_and_delivery_flip() {
        let (ledger, account_id) = ledger_with_account();
        let order_id = recorded_order(&ledger, account_id);

        let fill_id = ledger
            .record_fill(NewFill {
                order_id,
                filled_qty: dec!(100),
                price: dec!(10),
                transaction_fee: dec!(1),
                canceled_qty: dec!(0),
                execution_time: Utc::now(),
                delivery_amount: dec!(100),
            })
            .unwrap();

        assert_eq!(ledger.undelivered_fills().unwrap().len(), 1);

        let fill = ledger.mark_fill_delivered(fill_id).unwrap();
        assert!(fill.is_delivered());
        assert!(ledger.undelivered_fills().unwrap().is_empty());
    }

    #[test]
    fn test_order_filter() {
        let (ledger, account_id) = ledger_with_account();
        let order_id = recorded_order(&ledger, account_id);
        ledger.mark_submitted(order_id, Utc::now(), None).unwrap();

        let by_account = ledger.orders(&OrderFilter::account(account_id)).unwrap();
        assert_eq!(by_account.len(), 1);

        let submitted = ledger
            .orders(&OrderFilter::account(account_id).with_status(OrderStatus::Submitted))
            .unwrap();
        assert_eq!(submitted.len(), 1);

        let sells = ledger
            .orders(&OrderFilter::account(account_id).with_direction(OrderDirection::Sell))
            .unwrap();
        assert!(sells.is_empty());

        let other_symbol = ledger
            .orders(&OrderFilter::account(account_id).with_symbol("999999"))
            .unwrap();
        assert!(other_symbol.is_empty());
    }
}
