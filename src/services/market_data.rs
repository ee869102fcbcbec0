//! Market data provider interface.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::market::Candle;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("market data request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("market data payload malformed: {0}")]
    Malformed(String),
}

/// Source of OHLCV series. The poll loop treats any error as "no data this
/// cycle" for the asset; failures never propagate past it.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Ordered candles (most-recent last) for a symbol at one interval over
    /// a lookback range, e.g. `("EURUSD=X", "1m", "2d")`.
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<Candle>, MarketDataError>;
}

/// Provider that always reports no data. Used where a deployment runs the
/// HTTP surface without a live feed.
pub struct PlaceholderMarketDataProvider;

#[async_trait]
impl MarketDataProvider for PlaceholderMarketDataProvider {
    async fn fetch_candles(
        &self,
        _symbol: &str,
        _interval: &str,
        _range: &str,
    ) -> Result<Vec<Candle>, MarketDataError> {
        Ok(Vec::new())
    }
}
