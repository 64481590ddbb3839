//! Signal interface types
//!
//! A strategy engine hands the trading core one signal vector per
//! rebalancing cycle, tagged with the mode that says how the numbers are
//! to be read. The translator turns a frame into [`OrderIntent`]s.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderDirection, PositionSide};
use crate::values::Symbol;

/// How a signal vector is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalMode {
    /// Target fractional allocation per symbol (traded when the gap to
    /// the current allocation crosses the configured thresholds)
    Pt,
    /// Fractional trade size: positive = spend that fraction of total
    /// equity, negative = sell that fraction of the holding
    Ps,
    /// Literal trade quantity delta
    Vs,
}

/// One signal vector for a fixed symbol universe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalFrame {
    pub mode: SignalMode,
    /// Ordered symbol universe
    pub symbols: Vec<Symbol>,
    /// One value per symbol, aligned with `symbols`
    pub values: Vec<Decimal>,
}

impl SignalFrame {
    pub fn new(mode: SignalMode, symbols: Vec<Symbol>, values: Vec<Decimal>) -> Self {
        Self {
            mode,
            symbols,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// A side-tagged order intent produced by signal translation
///
/// Intents are what itemization emits; persisting one yields an order in
/// `created` state against the (account, symbol, side) position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub symbol: Symbol,
    pub side: PositionSide,
    pub direction: OrderDirection,
    pub qty: Decimal,
}
