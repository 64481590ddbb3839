//! The live trading cycle
//!
//! An unbounded loop driven by two events:
//!
//! - the cycle interval: pull the next signal frame, translate it
//!   against current prices/holdings/cash, persist the intents as
//!   `created` orders, and submit each one to the venue as its own task
//! - an incoming fill notice: book it through the order lifecycle as
//!   its own task
//!
//! A cycle that fails to translate or persist is logged and skipped -
//! the loop never dies on a single bad cycle. There is no graceful
//! drain on shutdown: outstanding orders stay `submitted` and reconcile
//! on whatever fill notification arrives next.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::mpsc;

use hermes_core::{AccountId, OrderId, SignalFrame, Symbol};
use hermes_ports::{ExecutionVenue, FillNotice, LedgerStore, PriceSource, SignalSource};
use hermes_trader::{OrderLifecycle, SignalTranslator, TraderError, TraderResult};

use crate::bootstrap::{RunnerConfig, TradingBootstrap};

/// Drives the signal -> order -> fill cycle for one account
pub struct TradeLoop {
    config: RunnerConfig,
    ledger: Arc<dyn LedgerStore>,
    lifecycle: Arc<OrderLifecycle>,
    translator: SignalTranslator,
    signals: Box<dyn SignalSource>,
    prices: Arc<dyn PriceSource>,
    venue: Arc<dyn ExecutionVenue>,
    fills: mpsc::Receiver<FillNotice>,
    account_id: AccountId,
}

impl TradeLoop {
    pub fn new(
        config: RunnerConfig,
        bootstrap: &TradingBootstrap,
        signals: Box<dyn SignalSource>,
        prices: Arc<dyn PriceSource>,
        venue: Arc<dyn ExecutionVenue>,
        fills: mpsc::Receiver<FillNotice>,
    ) -> Self {
        let translator = SignalTranslator::new(config.trader.clone());
        Self {
            config,
            ledger: Arc::clone(&bootstrap.ledger),
            lifecycle: Arc::clone(&bootstrap.lifecycle),
            translator,
            signals,
            prices,
            venue,
            fills,
            account_id: bootstrap.account_id,
        }
    }

    /// Run until the signal source is exhausted or the venue goes away
    ///
    /// Each submission and each fill application is an independent unit
    /// of work; the loop itself only orchestrates.
    pub async fn run(mut self) {
        log::info!(
            "trade loop started for account {} (interval {:?})",
            self.account_id,
            self.config.interval
        );
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.run_cycle().await {
                        Ok(Some(submitted)) => {
                            if submitted > 0 {
                                log::info!("cycle dispatched {submitted} orders");
                            }
                        }
                        Ok(None) => {
                            log::info!("signal source exhausted, stopping loop");
                            break;
                        }
                        // a bad cycle is logged, the loop continues
                        Err(e) => log::warn!("trading cycle failed: {e}"),
                    }
                }
                notice = self.fills.recv() => {
                    match notice {
                        Some(notice) => self.dispatch_fill(notice),
                        None => {
                            log::info!("fill channel closed, stopping loop");
                            break;
                        }
                    }
                }
            }
        }
        log::info!("trade loop stopped for account {}", self.account_id);
    }

    /// One trading cycle; `Ok(None)` means the signal source is done
    async fn run_cycle(&mut self) -> TraderResult<Option<usize>> {
        let Some(frame) = self.signals.next_frame().await else {
            return Ok(None);
        };
        if frame.is_empty() {
            return Ok(Some(0));
        }

        let prices = self.lookup_prices(&frame)?;
        let (own_amounts, available_amounts) = self
            .lifecycle
            .signed_holdings(self.account_id, &frame.symbols)?;
        let account = self.ledger.account(self.account_id)?;

        let intents = self.translator.translate(
            &frame,
            &prices,
            &own_amounts,
            &available_amounts,
            account.cash_amount,
            account.available_cash,
        )?;
        if intents.is_empty() {
            return Ok(Some(0));
        }

        let price_map: HashMap<Symbol, Decimal> = frame
            .symbols
            .iter()
            .cloned()
            .zip(prices.iter().copied())
            .collect();
        let order_ids = self
            .lifecycle
            .persist_intents(self.account_id, &intents, &price_map)?;

        for order_id in &order_ids {
            self.dispatch_submission(*order_id);
        }
        Ok(Some(order_ids.len()))
    }

    fn lookup_prices(&self, frame: &SignalFrame) -> TraderResult<Vec<Decimal>> {
        frame
            .symbols
            .iter()
            .map(|symbol| {
                self.prices
                    .price(symbol)
                    .ok_or_else(|| TraderError::MissingPrice(symbol.clone()))
            })
            .collect()
    }

    /// Submit one order as an independent task
    fn dispatch_submission(&self, order_id: OrderId) {
        let lifecycle = Arc::clone(&self.lifecycle);
        let venue = Arc::clone(&self.venue);

        tokio::spawn(async move {
            match lifecycle.submit(order_id).await {
                Ok(true) => {
                    let ticket = match lifecycle.ticket(order_id) {
                        Ok(ticket) => ticket,
                        Err(e) => {
                            log::error!("ticket for order {order_id} failed: {e}");
                            return;
                        }
                    };
                    if let Err(e) = venue.submit_order(&ticket).await {
                        log::error!("venue rejected order {order_id}: {e}");
                    }
                }
                Ok(false) => log::debug!("order {order_id} was already submitted"),
                Err(e) => log::warn!("submission of order {order_id} failed: {e}"),
            }
        });
    }

    /// Book one fill as an independent task
    fn dispatch_fill(&self, notice: FillNotice) {
        let lifecycle = Arc::clone(&self.lifecycle);

        tokio::spawn(async move {
            match lifecycle.apply_fill(&notice).await {
                Ok(fill) => log::debug!(
                    "booked fill {} for order {} ({} @ {})",
                    fill.id,
                    notice.order_id,
                    notice.filled_qty,
                    notice.price
                ),
                // never swallowed: a failed fill application means the
                // ledger and the venue disagree
                Err(e) => log::error!("fill for order {} failed: {e}", notice.order_id),
            }
        });
    }
}
