//! Yahoo Finance chart-API market data provider.

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::models::market::Candle;
use crate::services::market_data::{MarketDataError, MarketDataProvider};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

// The API emits nulls for bars still forming or gapped sessions.
#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the provider at a different host (mock servers in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for YahooFinanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[("interval", interval), ("range", range)])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let payload: ChartResponse = response.json().await?;

        if let Some(error) = payload.chart.error {
            if !error.is_null() {
                return Err(MarketDataError::Malformed(error.to_string()));
            }
        }

        let result = payload
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| MarketDataError::Malformed("chart result missing".to_string()))?;

        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::Malformed("quote block missing".to_string()))?;

        let mut candles = Vec::with_capacity(result.timestamp.len());
        for (i, &ts) in result.timestamp.iter().enumerate() {
            let bar = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
                quote.volume.get(i).copied().flatten(),
                DateTime::from_timestamp(ts, 0),
            );
            if let (Some(open), Some(high), Some(low), Some(close), Some(volume), Some(time)) = bar
            {
                candles.push(Candle::new(open, high, low, close, volume, time));
            }
        }

        debug!(
            symbol,
            interval,
            bars = candles.len(),
            "fetched candle series"
        );
        Ok(candles)
    }
}
