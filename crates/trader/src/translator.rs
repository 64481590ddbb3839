//! Signal translation
//!
//! Converts a raw signal vector plus current holdings and cash into
//! discrete, side-tagged order intents:
//!
//! 1. Parse the vector by mode (PT / PS / VS) into a planned
//!    cash-to-spend and quantity-to-sell per symbol
//! 2. Round the planned amounts to the configured precision
//! 3. Ration planned buys proportionally against available cash
//! 4. Itemize into intents, capping sells at the available quantity and
//!    splitting over-ambitious closes into a close plus an opposite-side
//!    open when short-selling is enabled
//!
//! Sign conventions on the planned amounts (kept deliberately, including
//! the asymmetric short legs):
//!
//! - long buy:    positive cash_to_spend
//! - short open:  negative cash_to_spend
//! - long sell:   negative amount_to_sell
//! - short cover: positive amount_to_sell
//!
//! No I/O: a pure function of its inputs and the configuration.

use hermes_core::{OrderDirection, OrderIntent, PositionSide, SignalFrame, SignalMode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::TraderConfig;
use crate::error::{TraderError, TraderResult};

/// Planned amounts below this magnitude are not tradeable
const EPSILON: Decimal = dec!(0.001);

/// Per-symbol planned amounts prior to itemization
struct Planned {
    cash_to_spend: Vec<Decimal>,
    amounts_to_sell: Vec<Decimal>,
}

/// Translates signal frames into order intents
pub struct SignalTranslator {
    config: TraderConfig,
}

impl SignalTranslator {
    pub fn new(config: TraderConfig) -> Self {
        Self { config }
    }

    /// Translate one frame
    ///
    /// `own_amounts` / `available_amounts` are signed holdings per symbol
    /// (positive = long, negative = short), aligned with the frame's
    /// symbol order. `own_cash` is the account's total cash (equity
    /// basis); `available_cash` bounds the buy rationing.
    pub fn translate(
        &self,
        frame: &SignalFrame,
        prices: &[Decimal],
        own_amounts: &[Decimal],
        available_amounts: &[Decimal],
        own_cash: Decimal,
        available_cash: Decimal,
    ) -> TraderResult<Vec<OrderIntent>> {
        self.validate(frame, prices, own_amounts, available_amounts)?;

        let mut planned = match frame.mode {
            SignalMode::Pt => self.parse_pt(&frame.values, prices, own_amounts, own_cash)?,
            SignalMode::Ps => self.parse_ps(&frame.values, prices, own_amounts, own_cash)?,
            SignalMode::Vs => self.parse_vs(&frame.values, prices, own_amounts),
        };

        self.round(&mut planned);
        self.ration_cash(&mut planned, available_cash);

        Ok(self.itemize(frame, &planned, prices, available_amounts))
    }

    fn validate(
        &self,
        frame: &SignalFrame,
        prices: &[Decimal],
        own_amounts: &[Decimal],
        available_amounts: &[Decimal],
    ) -> TraderResult<()> {
        let n = frame.symbols.len();
        if frame.values.len() != n {
            return Err(TraderError::FrameLengthMismatch {
                symbols: n,
                values: frame.values.len(),
            });
        }
        for (what, got) in [
            ("prices", prices.len()),
            ("own_amounts", own_amounts.len()),
            ("available_amounts", available_amounts.len()),
        ] {
            if got != n {
                return Err(TraderError::InputLengthMismatch {
                    what,
                    got,
                    expected: n,
                });
            }
        }
        for (symbol, price) in frame.symbols.iter().zip(prices) {
            if *price <= Decimal::ZERO {
                return Err(TraderError::InvalidPrice {
                    symbol: symbol.clone(),
                    price: *price,
                });
            }
        }
        Ok(())
    }

    /// PT: signal is the target fractional allocation; trade the gap to
    /// the current allocation once it crosses the thresholds.
    fn parse_pt(
        &self,
        signals: &[Decimal],
        prices: &[Decimal],
        own_amounts: &[Decimal],
        own_cash: Decimal,
    ) -> TraderResult<Planned> {
        let total_value = equity(prices, own_amounts, own_cash);
        if total_value <= Decimal::ZERO {
            return Err(TraderError::NonPositiveEquity(total_value));
        }

        let buy_gate = self.config.pt_buy_threshold;
        let sell_gate = -self.config.pt_sell_threshold;
        let n = signals.len();
        let mut planned = Planned::zeroed(n);

        for i in 0..n {
            let held = own_amounts[i];
            let current = held * prices[i] / total_value;
            let gap = signals[i] - current;

            // close a long proportionally to the allocation gap
            if gap < sell_gate && held > Decimal::ZERO {
                planned.amounts_to_sell[i] += gap / current * held;
            }
            // open or extend a long
            if gap > buy_gate && held >= Decimal::ZERO {
                planned.cash_to_spend[i] += gap * total_value;
            }

            if self.config.allow_sell_short {
                // open or extend a short (negative cash)
                if gap < sell_gate && held <= Decimal::ZERO {
                    planned.cash_to_spend[i] += gap * total_value;
                }
                // cover a short (positive amount, since covering buys)
                if gap > buy_gate && held < Decimal::ZERO {
                    planned.amounts_to_sell[i] += gap / current * held;
                }
            }
        }
        Ok(planned)
    }

    /// PS: signal is a fractional trade size - of total equity for buys,
    /// of the current holding for sells.
    fn parse_ps(
        &self,
        signals: &[Decimal],
        prices: &[Decimal],
        own_amounts: &[Decimal],
        own_cash: Decimal,
    ) -> TraderResult<Planned> {
        let total_value = equity(prices, own_amounts, own_cash);
        if total_value <= Decimal::ZERO {
            return Err(TraderError::NonPositiveEquity(total_value));
        }

        let n = signals.len();
        let mut planned = Planned::zeroed(n);

        for i in 0..n {
            let signal = signals[i];
            let held = own_amounts[i];

            if signal < Decimal::ZERO && held > Decimal::ZERO {
                planned.amounts_to_sell[i] += signal * held;
            }
            if signal > Decimal::ZERO && held >= Decimal::ZERO {
                planned.cash_to_spend[i] += signal * total_value;
            }

            if self.config.allow_sell_short {
                if signal < Decimal::ZERO && held <= Decimal::ZERO {
                    planned.cash_to_spend[i] += signal * total_value;
                }
                if signal > Decimal::ZERO && held < Decimal::ZERO {
                    planned.amounts_to_sell[i] -= signal * held;
                }
            }
        }
        Ok(planned)
    }

    /// VS: signal is a literal quantity delta.
    fn parse_vs(&self, signals: &[Decimal], prices: &[Decimal], own_amounts: &[Decimal]) -> Planned {
        let n = signals.len();
        let mut planned = Planned::zeroed(n);

        for i in 0..n {
            let signal = signals[i];
            let held = own_amounts[i];

            if signal < Decimal::ZERO && held > Decimal::ZERO {
                planned.amounts_to_sell[i] += signal;
            }
            if signal > Decimal::ZERO && held >= Decimal::ZERO {
                planned.cash_to_spend[i] += signal * prices[i];
            }

            if self.config.allow_sell_short {
                if signal < Decimal::ZERO && held <= Decimal::ZERO {
                    planned.cash_to_spend[i] += signal * prices[i];
                }
                if signal > Decimal::ZERO && held < Decimal::ZERO {
                    planned.amounts_to_sell[i] += signal;
                }
            }
        }
        planned
    }

    fn round(&self, planned: &mut Planned) {
        let dp = self.config.precision;
        for amount in planned
            .cash_to_spend
            .iter_mut()
            .chain(planned.amounts_to_sell.iter_mut())
        {
            *amount = amount.round_dp(dp);
        }
    }

    /// Proportional rationing: if the planned buys together exceed
    /// available cash, scale every entry by the same ratio. Not a
    /// priority queue - all symbols shrink uniformly.
    fn ration_cash(&self, planned: &mut Planned, available_cash: Decimal) {
        let requested: Decimal = planned
            .cash_to_spend
            .iter()
            .filter(|cash| **cash > Decimal::ZERO)
            .sum();
        if requested > available_cash && requested > Decimal::ZERO {
            let ratio = available_cash.max(Decimal::ZERO) / requested;
            for cash in &mut planned.cash_to_spend {
                *cash *= ratio;
            }
        }
    }

    fn itemize(
        &self,
        frame: &SignalFrame,
        planned: &Planned,
        prices: &[Decimal],
        available_amounts: &[Decimal],
    ) -> Vec<OrderIntent> {
        let allow_short = self.config.allow_sell_short;
        let mut intents = Vec::new();

        for (i, symbol) in frame.symbols.iter().enumerate() {
            let cash = planned.cash_to_spend[i];
            let sell = planned.amounts_to_sell[i];
            let price = prices[i];
            let available = available_amounts[i];

            let mut push = |side: PositionSide, direction: OrderDirection, qty: Decimal| {
                if qty > EPSILON {
                    intents.push(OrderIntent {
                        symbol: symbol.clone(),
                        side,
                        direction,
                        qty,
                    });
                }
            };

            // long buy
            if cash > EPSILON {
                push(PositionSide::Long, OrderDirection::Buy, cash / price);
            }
            // short open
            if cash < -EPSILON && allow_short {
                push(PositionSide::Short, OrderDirection::Buy, -cash / price);
            }
            // long sell; an over-available close caps at the available
            // quantity and, with short-selling on, flips the shortfall
            // into a short open
            if sell < -EPSILON {
                if sell < -available {
                    push(PositionSide::Long, OrderDirection::Sell, available);
                    if allow_short {
                        push(PositionSide::Short, OrderDirection::Buy, -sell - available);
                    }
                } else {
                    push(PositionSide::Long, OrderDirection::Sell, -sell);
                }
            }
            // short cover; `available` is negative on the short side, so
            // an over-available cover sells the short out and buys the
            // remainder back on the long side
            if sell > EPSILON && allow_short {
                if sell > available {
                    push(PositionSide::Short, OrderDirection::Sell, -available);
                    push(PositionSide::Long, OrderDirection::Buy, sell + available);
                } else {
                    push(PositionSide::Short, OrderDirection::Sell, sell);
                }
            }
        }
        intents
    }
}

/// Mark-to-market equity: holdings at current prices plus cash
fn equity(prices: &[Decimal], own_amounts: &[Decimal], own_cash: Decimal) -> Decimal {
    prices
        .iter()
        .zip(own_amounts)
        .map(|(price, held)| *price * *held)
        .sum::<Decimal>()
        + own_cash
}

impl Planned {
    fn zeroed(n: usize) -> Self {
        Self {
            cash_to_spend: vec![Decimal::ZERO; n],
            amounts_to_sell: vec![Decimal::ZERO; n],
        }
    }
}
