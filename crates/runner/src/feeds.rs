//! Deterministic signal and price feeds
//!
//! Simple port implementations for simulations and tests: a scripted
//! sequence of signal frames and a fixed price table. A deployment
//! plugs real strategy-engine and market-data adapters into the same
//! ports instead.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;

use hermes_core::{Price, SignalFrame, Symbol};
use hermes_ports::{PriceSource, SignalSource};

/// Replays a fixed sequence of frames, then reports exhaustion
pub struct ScriptedSignalSource {
    frames: VecDeque<SignalFrame>,
}

impl ScriptedSignalSource {
    pub fn new(frames: impl IntoIterator<Item = SignalFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

#[async_trait]
impl SignalSource for ScriptedSignalSource {
    async fn next_frame(&mut self) -> Option<SignalFrame> {
        self.frames.pop_front()
    }
}

/// Fixed price per symbol
pub struct StaticPriceSource {
    prices: HashMap<Symbol, Price>,
}

impl StaticPriceSource {
    pub fn new(prices: impl IntoIterator<Item = (Symbol, Price)>) -> Self {
        Self {
            prices: prices.into_iter().collect(),
        }
    }
}

impl PriceSource for StaticPriceSource {
    fn price(&self, symbol: &str) -> Option<Price> {
        self.prices.get(symbol).copied()
    }
}
