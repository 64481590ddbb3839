//! Order lifecycle management
//!
//! Owns the order state machine end to end: persisting translated
//! intents as `created` orders, gating submission against available
//! resources, and booking venue fills into the ledger.
//!
//! Every multi-record mutation (submission gating, fill application,
//! the settlement pass a fill triggers) runs under a per-account mutex,
//! so two in-flight fills against the same account cannot interleave
//! their ledger writes. Individual record updates are additionally
//! atomic inside the ledger store.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use hermes_core::{
    AccountId, CashDelta, Fill, OrderDirection, OrderId, OrderIntent, OrderStatus, OrderType,
    Position, QtyDelta, Symbol,
};
use hermes_ports::{Clock, FillNotice, LedgerStore, NewFill, NewOrder, OrderTicket};

use crate::config::TraderConfig;
use crate::error::{TraderError, TraderResult};
use crate::settlement::SettlementProcessor;

/// Per-account lock registry
///
/// Locks are created on first use and kept for the account's lifetime.
#[derive(Clone, Default)]
struct AccountLocks {
    inner: Arc<DashMap<AccountId, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    async fn lock(&self, account_id: AccountId) -> OwnedMutexGuard<()> {
        let lock = self
            .inner
            .entry(account_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

/// Drives orders through created -> submitted -> filled/canceled
pub struct OrderLifecycle {
    ledger: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    config: TraderConfig,
    settlement: SettlementProcessor,
    locks: AccountLocks,
}

impl OrderLifecycle {
    pub fn new(ledger: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>, config: TraderConfig) -> Self {
        let settlement =
            SettlementProcessor::new(Arc::clone(&ledger), Arc::clone(&clock), config.clone());
        Self {
            ledger,
            clock,
            config,
            settlement,
            locks: AccountLocks::default(),
        }
    }

    /// The settlement processor sharing this lifecycle's ledger and clock
    pub fn settlement(&self) -> &SettlementProcessor {
        &self.settlement
    }

    /// Persist translated intents as `created` market orders
    ///
    /// Positions are opened lazily: the first order against an
    /// (account, symbol, side) triple creates the empty position row.
    pub fn persist_intents(
        &self,
        account_id: AccountId,
        intents: &[OrderIntent],
        prices: &HashMap<Symbol, Decimal>,
    ) -> TraderResult<Vec<OrderId>> {
        let mut order_ids = Vec::with_capacity(intents.len());
        for intent in intents {
            let price = *prices
                .get(&intent.symbol)
                .ok_or_else(|| TraderError::MissingPrice(intent.symbol.clone()))?;
            let position_id = self.ledger.get_or_create_position(
                account_id,
                &intent.symbol,
                intent.side,
                self.clock.now(),
            )?;
            let order_id = self.ledger.record_order(
                NewOrder {
                    position_id,
                    direction: intent.direction,
                    order_type: OrderType::Market,
                    qty: intent.qty,
                    price,
                },
                self.clock.now(),
            )?;
            order_ids.push(order_id);
        }
        Ok(order_ids)
    }

    /// Submit an order to the venue-facing side of the lifecycle
    ///
    /// Only `created` orders are submitted; anything else returns
    /// `Ok(false)` (a re-submission is a no-op, not an error). A
    /// resource shortfall is advisory - logged and submitted anyway -
    /// unless `strict_submission` is configured.
    pub async fn submit(&self, order_id: OrderId) -> TraderResult<bool> {
        let order = self.ledger.order(order_id)?;
        if order.status != OrderStatus::Created {
            return Ok(false);
        }
        let position = self.ledger.position(order.position_id)?;
        let _guard = self.locks.lock(position.account_id).await;

        match order.direction {
            OrderDirection::Buy => {
                let account = self.ledger.account(position.account_id)?;
                let required = order.notional();
                if account.available_cash < required {
                    self.shortfall("cash", order_id, required, account.available_cash)?;
                }
            }
            OrderDirection::Sell => {
                if position.available_qty < order.qty {
                    self.shortfall("quantity", order_id, order.qty, position.available_qty)?;
                }
            }
        }

        self.ledger.mark_submitted(order_id, self.clock.now(), None)?;
        Ok(true)
    }

    fn shortfall(
        &self,
        resource: &'static str,
        order_id: OrderId,
        required: Decimal,
        available: Decimal,
    ) -> TraderResult<()> {
        if self.config.strict_submission {
            return Err(TraderError::InsufficientResources {
                resource,
                order_id,
                required,
                available,
            });
        }
        log::warn!(
            "available {resource} {available} is not enough for order {order_id} \
             (required {required}); submitting anyway, the venue decides execution"
        );
        Ok(())
    }

    /// Build the venue ticket for a submitted order
    pub fn ticket(&self, order_id: OrderId) -> TraderResult<OrderTicket> {
        let order = self.ledger.order(order_id)?;
        let position = self.ledger.position(order.position_id)?;
        Ok(OrderTicket {
            order_id: order.id,
            symbol: position.symbol,
            side: position.side,
            direction: order.direction,
            qty: order.qty,
            price: order.price,
        })
    }

    /// Book one venue execution report
    ///
    /// Settles the account's delivery backlog first, then validates the
    /// report against the order's remaining quantity, persists the fill,
    /// and mutates position and account:
    ///
    /// - buy: quantity lands in `Position.qty` only (reserved until
    ///   delivery); cash leaves both balances
    /// - sell: cash lands in `Account.cash_amount` only (reserved until
    ///   delivery); quantity leaves both balances
    pub async fn apply_fill(&self, notice: &FillNotice) -> TraderResult<Fill> {
        let order = self.ledger.order(notice.order_id)?;
        let position = self.ledger.position(order.position_id)?;
        let account_id = position.account_id;
        let _guard = self.locks.lock(account_id).await;

        // settle history before booking the new result
        self.settlement.process_account(account_id)?;

        // re-read under the lock; a concurrent fill may have advanced
        // the order
        let order = self.ledger.order(notice.order_id)?;
        if !order.status.is_fillable() {
            return Err(TraderError::OrderNotFillable {
                order_id: order.id,
                status: order.status,
            });
        }

        let prior_filled: Decimal = self
            .ledger
            .fills_for_order(order.id)?
            .iter()
            .map(|f| f.filled_qty)
            .sum();
        let remaining = order.qty - prior_filled;

        let next_status = if notice.canceled_qty > Decimal::ZERO {
            // the venue cancels the whole remainder or nothing
            if notice.canceled_qty != remaining {
                return Err(TraderError::CanceledQtyMismatch {
                    order_id: order.id,
                    canceled: notice.canceled_qty,
                    remaining,
                });
            }
            OrderStatus::Canceled
        } else if notice.filled_qty > remaining {
            return Err(TraderError::FillExceedsRemaining {
                order_id: order.id,
                filled: notice.filled_qty,
                remaining,
            });
        } else if notice.filled_qty == remaining {
            OrderStatus::Filled
        } else {
            OrderStatus::PartialFilled
        };

        let position_change = notice.filled_qty;
        let gross = notice.filled_qty * notice.price;
        let cash_change = match order.direction {
            OrderDirection::Sell => gross - notice.transaction_fee,
            OrderDirection::Buy => -gross - notice.transaction_fee,
        };
        let delivery_amount = match order.direction {
            OrderDirection::Buy => position_change,
            OrderDirection::Sell => cash_change,
        };

        let fill_id = self.ledger.record_fill(NewFill {
            order_id: order.id,
            filled_qty: notice.filled_qty,
            price: notice.price,
            transaction_fee: notice.transaction_fee,
            canceled_qty: notice.canceled_qty,
            execution_time: notice.execution_time,
            delivery_amount,
        })?;

        match order.direction {
            OrderDirection::Buy => {
                self.ledger
                    .update_account_balance(account_id, CashDelta::both(cash_change))?;
                self.ledger.update_position(
                    order.position_id,
                    QtyDelta::total(position_change),
                    self.clock.now(),
                )?;
            }
            OrderDirection::Sell => {
                self.ledger
                    .update_account_balance(account_id, CashDelta::total(cash_change))?;
                self.ledger.update_position(
                    order.position_id,
                    QtyDelta::both(-position_change),
                    self.clock.now(),
                )?;
            }
        }

        self.ledger.transition_order(order.id, next_status)?;

        log::debug!(
            "booked fill {fill_id} for order {}: {:?} {} @ {} -> {next_status:?}",
            order.id,
            order.direction,
            notice.filled_qty,
            notice.price
        );
        Ok(self.ledger.fill(fill_id)?)
    }

    /// Run a settlement pass for an account under its lock
    pub async fn settle(&self, account_id: AccountId) -> TraderResult<usize> {
        let _guard = self.locks.lock(account_id).await;
        self.settlement.process_account(account_id)
    }

    /// Signed (held, available) quantities per symbol
    ///
    /// Long holdings are positive, short holdings negative. A symbol
    /// with live quantity on both sides at once is a data error.
    pub fn signed_holdings(
        &self,
        account_id: AccountId,
        symbols: &[Symbol],
    ) -> TraderResult<(Vec<Decimal>, Vec<Decimal>)> {
        let positions = self.ledger.account_positions(account_id)?;
        let mut own = Vec::with_capacity(symbols.len());
        let mut available = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let held: Vec<&Position> = positions
                .iter()
                .filter(|p| p.symbol == *symbol && p.qty > Decimal::ZERO)
                .collect();
            match held.as_slice() {
                [] => {
                    own.push(Decimal::ZERO);
                    available.push(Decimal::ZERO);
                }
                [position] => {
                    own.push(position.signed_qty());
                    available.push(position.signed_available_qty());
                }
                _ => {
                    return Err(TraderError::ConflictingHoldings {
                        symbol: symbol.clone(),
                    });
                }
            }
        }
        Ok((own, available))
    }
}
