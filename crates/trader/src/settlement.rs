//! Settlement processing
//!
//! A fill's proceeds stay reserved until the configured delivery period
//! has elapsed: bought quantity sits in `Position.qty` but not
//! `available_qty`, sale cash sits in `Account.cash_amount` but not
//! `available_cash`. The settlement processor releases both once the
//! day-count is reached and flips the fill to delivered.
//!
//! Delivery is a whole-day count between the fill's execution date and
//! the clock's current date - a T+1 lag without calendar or holiday
//! modelling.

use std::sync::Arc;

use hermes_core::{AccountId, CashDelta, OrderDirection, QtyDelta};
use hermes_ports::{Clock, LedgerStore};

use crate::config::TraderConfig;
use crate::error::TraderResult;

/// Releases delivered fills into the available balances
#[derive(Clone)]
pub struct SettlementProcessor {
    ledger: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    config: TraderConfig,
}

impl SettlementProcessor {
    pub fn new(ledger: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>, config: TraderConfig) -> Self {
        Self {
            ledger,
            clock,
            config,
        }
    }

    /// Deliver every due fill belonging to `account_id`
    ///
    /// Idempotent: already-delivered fills are never revisited, and
    /// fills whose delay has not elapsed are left alone. Returns the
    /// number of fills delivered in this pass.
    pub fn process_account(&self, account_id: AccountId) -> TraderResult<usize> {
        let today = self.clock.now().date_naive();
        let mut delivered = 0;

        for fill in self.ledger.undelivered_fills()? {
            let order = self.ledger.order(fill.order_id)?;
            let position = self.ledger.position(order.position_id)?;
            if position.account_id != account_id {
                continue;
            }

            // buys deliver quantity, sells deliver cash
            let period = match order.direction {
                OrderDirection::Buy => self.config.stock_delivery_period,
                OrderDirection::Sell => self.config.cash_delivery_period,
            };
            let elapsed = (today - fill.execution_time.date_naive()).num_days();
            if elapsed < i64::from(period) {
                continue;
            }

            match order.direction {
                OrderDirection::Buy => {
                    self.ledger.update_position(
                        order.position_id,
                        QtyDelta::available(fill.delivery_amount),
                        self.clock.now(),
                    )?;
                }
                OrderDirection::Sell => {
                    self.ledger
                        .update_account_balance(account_id, CashDelta::available(fill.delivery_amount))?;
                }
            }
            self.ledger.mark_fill_delivered(fill.id)?;
            delivered += 1;

            log::debug!(
                "delivered fill {} ({:?} {} for order {})",
                fill.id,
                order.direction,
                fill.delivery_amount,
                order.id
            );
        }
        Ok(delivered)
    }
}
