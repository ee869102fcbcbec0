//! Chart-ready derived series, aligned bar-for-bar with the source candles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::momentum::calculate_rsi;
use crate::indicators::trend::ema_series;
use crate::indicators::volatility::calculate_atr;
use crate::models::market::Candle;

/// Per-bar EMA fast/slow values aligned to timestamps and closes, plus the
/// latest RSI and ATR readings. This is the payload the presentation layer
/// renders as a chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub asset: String,
    pub timestamps: Vec<DateTime<Utc>>,
    pub close: Vec<f64>,
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr: Option<f64>,
}

impl IndicatorSeries {
    /// Build the full aligned series from an ordered candle sequence.
    ///
    /// RSI and ATR stay `None` when the window is too short for their
    /// periods; the EMA columns are always as long as the input.
    pub fn from_candles(
        asset: impl Into<String>,
        candles: &[Candle],
        fast_span: usize,
        slow_span: usize,
    ) -> Self {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        Self {
            asset: asset.into(),
            timestamps: candles.iter().map(|c| c.timestamp).collect(),
            ema_fast: ema_series(&closes, fast_span),
            ema_slow: ema_series(&closes, slow_span),
            close: closes,
            rsi: calculate_rsi(candles, 14),
            atr: calculate_atr(candles, 14),
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}
