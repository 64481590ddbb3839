use hermes_core::Price;

/// Port to market data: a synchronous price lookup per symbol
pub trait PriceSource: Send + Sync {
    /// Current price for a symbol; `None` when the symbol is unknown
    fn price(&self, symbol: &str) -> Option<Price>;
}
