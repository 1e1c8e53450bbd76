use async_trait::async_trait;

use crate::{Candle, Result};

/// Abstraction over the market-data source.
///
/// `BinanceClient` in `crates/market` implements this for live data.
/// Analysis loops only ever hold a `dyn MarketData`, so tests drive them
/// with scripted fakes.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch up to `limit` closed candles for `symbol` at the given
    /// interval granularity, oldest first.
    async fn klines(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>>;

    /// Latest traded price for a symbol.
    async fn current_price(&self, symbol: &str) -> Result<f64>;
}
