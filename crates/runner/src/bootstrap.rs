//! Bootstrap - ledger and account setup
//!
//! Assembles the pieces a trade loop needs: a ledger store, a clock, an
//! account funded with the initial capital, and an order lifecycle bound
//! to all three.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use hermes_clock::SystemClock;
use hermes_core::AccountId;
use hermes_ledger::MemoryLedger;
use hermes_ports::{Clock, LedgerResult, LedgerStore};
use hermes_trader::{OrderLifecycle, TraderConfig};

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Account owner registered at bootstrap
    pub owner: String,
    /// Initial capital, fully available
    pub initial_cash: Decimal,
    /// Delay between trading cycles
    pub interval: Duration,
    /// Trading core knobs
    pub trader: TraderConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            owner: "live-trader".to_string(),
            initial_cash: dec!(1_000_000),
            interval: Duration::from_secs(1),
            trader: TraderConfig::default(),
        }
    }
}

/// Assembled trading components, ready for a [`crate::TradeLoop`]
pub struct TradingBootstrap {
    pub ledger: Arc<dyn LedgerStore>,
    pub clock: Arc<dyn Clock>,
    pub lifecycle: Arc<OrderLifecycle>,
    pub account_id: AccountId,
}

impl TradingBootstrap {
    /// Bootstrap over an in-memory ledger and the system clock
    pub fn with_config(config: &RunnerConfig) -> LedgerResult<Self> {
        let ledger: Arc<dyn LedgerStore> = Arc::new(MemoryLedger::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
        Self::with_parts(config, ledger, clock)
    }

    /// Bootstrap over caller-provided ledger and clock (tests use a
    /// simulated clock here)
    pub fn with_parts(
        config: &RunnerConfig,
        ledger: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
    ) -> LedgerResult<Self> {
        let account_id = ledger.create_account(&config.owner, config.initial_cash, clock.now())?;
        log::info!(
            "registered account {} for '{}' with capital {}",
            account_id,
            config.owner,
            config.initial_cash
        );

        let lifecycle = Arc::new(OrderLifecycle::new(
            Arc::clone(&ledger),
            Arc::clone(&clock),
            config.trader.clone(),
        ));

        Ok(Self {
            ledger,
            clock,
            lifecycle,
            account_id,
        })
    }
}
