//! Trading core configuration
//!
//! One struct carries every recognized knob; components receive it
//! explicitly at construction (no module-level defaults).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone)]
pub struct TraderConfig {
    /// Allocation-gap a PT signal must exceed before a buy is generated
    pub pt_buy_threshold: Decimal,
    /// Allocation-gap magnitude a PT signal must exceed before a sell is
    /// generated
    pub pt_sell_threshold: Decimal,
    /// Allow opening and closing short positions
    pub allow_sell_short: bool,
    /// Days between a sell fill and its cash becoming available
    pub cash_delivery_period: u32,
    /// Days between a buy fill and its quantity becoming available
    pub stock_delivery_period: u32,
    /// Decimal places planned amounts are rounded to
    pub precision: u32,
    /// Refuse submission on a resource shortfall instead of warning.
    /// Off by default: the venue, not the local ledger, decides whether
    /// an order executes.
    pub strict_submission: bool,
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            pt_buy_threshold: dec!(0.1),
            pt_sell_threshold: dec!(0.1),
            allow_sell_short: false,
            cash_delivery_period: 0,
            stock_delivery_period: 0,
            precision: 3,
            strict_submission: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_permissive() {
        let config = TraderConfig::default();
        assert!(!config.allow_sell_short);
        assert!(!config.strict_submission);
        assert_eq!(config.cash_delivery_period, 0);
        assert_eq!(config.stock_delivery_period, 0);
        assert_eq!(config.precision, 3);
    }
}
