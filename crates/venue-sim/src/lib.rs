//! Hermes Venue Simulator
//!
//! A stand-in for an external broker: acknowledges submitted tickets
//! immediately, then reports executions asynchronously after a
//! configurable latency. There is no matching here - the venue replays
//! whatever fill plan it was configured with, which is exactly what
//! lifecycle and loop tests need to stay deterministic.
//!
//! Notices arrive on the mpsc receiver handed out at construction; the
//! signal loop consumes them and books the fills.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use hermes_ports::{Clock, ExecutionVenue, FillNotice, OrderTicket, VenueResult};

/// How the venue executes a submitted ticket
#[derive(Debug, Clone)]
pub enum FillPlan {
    /// One full fill at the ticket price
    Immediate,
    /// One fill per fraction of the ticket quantity, in order. Fractions
    /// summing below one leave the order partially filled.
    Tranches(Vec<Decimal>),
    /// Cancel the full quantity without filling
    Cancel,
}

/// Venue behavior knobs
#[derive(Debug, Clone)]
pub struct SimVenueConfig {
    /// Delay between acknowledgment and the first notice
    pub latency: Duration,
    /// Extra random latency, uniform in [0, jitter); zero disables it
    pub latency_jitter: Duration,
    /// Fee charged per fill as a fraction of gross value
    pub fee_rate: Decimal,
    pub fill_plan: FillPlan,
}

impl Default for SimVenueConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(10),
            latency_jitter: Duration::ZERO,
            fee_rate: Decimal::ZERO,
            fill_plan: FillPlan::Immediate,
        }
    }
}

/// Simulated execution venue
pub struct SimVenue {
    notices: mpsc::Sender<FillNotice>,
    clock: Arc<dyn Clock>,
    config: SimVenueConfig,
}

impl SimVenue {
    /// Create a venue and the receiver its notices arrive on
    pub fn new(
        clock: Arc<dyn Clock>,
        config: SimVenueConfig,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<FillNotice>) {
        let (notices, rx) = mpsc::channel(capacity);
        (
            Self {
                notices,
                clock,
                config,
            },
            rx,
        )
    }

    fn execution_delay(&self) -> Duration {
        let jitter = self.config.latency_jitter;
        if jitter.is_zero() {
            return self.config.latency;
        }
        let extra = rand::thread_rng().gen_range(Duration::ZERO..jitter);
        self.config.latency + extra
    }
}

/// The (filled, canceled) quantities the plan produces for one ticket
fn executions_for(plan: &FillPlan, qty: Decimal) -> Vec<(Decimal, Decimal)> {
    match plan {
        FillPlan::Immediate => vec![(qty, Decimal::ZERO)],
        FillPlan::Tranches(fractions) => fractions
            .iter()
            .map(|fraction| (qty * fraction, Decimal::ZERO))
            .collect(),
        FillPlan::Cancel => vec![(Decimal::ZERO, qty)],
    }
}

#[async_trait]
impl ExecutionVenue for SimVenue {
    async fn submit_order(&self, ticket: &OrderTicket) -> VenueResult<()> {
        log::debug!(
            "venue accepted order {}: {:?} {:?} {} {} @ {}",
            ticket.order_id,
            ticket.side,
            ticket.direction,
            ticket.symbol,
            ticket.qty,
            ticket.price
        );

        let notices = self.notices.clone();
        let clock = Arc::clone(&self.clock);
        let executions = executions_for(&self.config.fill_plan, ticket.qty);
        let fee_rate = self.config.fee_rate;
        let delay = self.execution_delay();
        let order_id = ticket.order_id;
        let price = ticket.price;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            for (filled_qty, canceled_qty) in executions {
                let report = FillNotice {
                    order_id,
                    filled_qty,
                    price,
                    transaction_fee: (filled_qty * price * fee_rate).round_dp(3),
                    canceled_qty,
                    execution_time: clock.now(),
                };
                if notices.send(report).await.is_err() {
                    log::warn!("notice channel closed, dropping reports for order {order_id}");
                    return;
                }
            }
        });
        Ok(())
    }
}
