//! Signal classifier: turns candle windows into BUY/SELL/none decisions.
//!
//! Two strategy variants exist behind the same interface. The
//! trend-confirmation variant works on a single timeframe and is gated on a
//! minimum ATR; the multi-timeframe variant requires agreement between a
//! fast and a slower interval and is gated on a neutral RSI band. Long and
//! short conditions are disjoint by construction (strict EMA5/EMA20
//! ordering on both branches), so no tie-break rule is needed.

use serde::{Deserialize, Serialize};

use crate::indicators::momentum::calculate_rsi;
use crate::indicators::trend::{calculate_ema, ema_series};
use crate::indicators::volatility::calculate_atr;
use crate::models::market::Candle;
use crate::models::signal::Signal;

/// Minimum bars before any classification is trusted: EMA20 warm-up plus
/// one prior bar for slope and confirmation history.
pub const MIN_CANDLES: usize = 21;

pub const EMA_FAST_SPAN: usize = 5;
pub const EMA_SLOW_SPAN: usize = 20;
pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;

const VOLUME_LOOKBACK: usize = 20;

/// Thresholds for the single-timeframe trend-confirmation variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfirmationConfig {
    /// Trailing bars over which EMA5 must stay strictly on one side of EMA20.
    pub confirm_bars: usize,
    /// Minimum relative gap `|close - EMA20| / EMA20`.
    pub min_gap: f64,
    /// ATR floor below which the asset is skipped this cycle.
    pub min_atr: f64,
}

impl Default for TrendConfirmationConfig {
    fn default() -> Self {
        Self {
            confirm_bars: 2,
            min_gap: 0.0002,
            min_atr: 0.0001,
        }
    }
}

/// Thresholds for the multi-timeframe confirmation variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiTimeframeConfig {
    /// Minimum one-bar relative close change.
    pub min_change: f64,
    /// RSI above this rejects the cycle (overbought guard).
    pub rsi_overbought: f64,
    /// RSI below this rejects the cycle (oversold guard).
    pub rsi_oversold: f64,
}

impl Default for MultiTimeframeConfig {
    fn default() -> Self {
        Self {
            min_change: 0.00005,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

/// The classifier variant selected at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum Strategy {
    TrendConfirmation(TrendConfirmationConfig),
    MultiTimeframe(MultiTimeframeConfig),
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::TrendConfirmation(TrendConfirmationConfig::default())
    }
}

/// Pure classification over candle windows. Holds no mutable state.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    strategy: Strategy,
}

impl SignalEngine {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Whether `evaluate` needs a slower-interval confirmation window.
    pub fn needs_confirmation_frame(&self) -> bool {
        matches!(self.strategy, Strategy::MultiTimeframe(_))
    }

    /// Classify the latest bar of `candles`. `confirm` is the slower
    /// interval's window, required only by the multi-timeframe variant.
    ///
    /// Any missing indicator (short window, no confirmation frame) degrades
    /// to `Signal::Neutral`.
    pub fn evaluate(&self, candles: &[Candle], confirm: Option<&[Candle]>) -> Signal {
        if candles.len() < MIN_CANDLES {
            return Signal::Neutral;
        }

        match &self.strategy {
            Strategy::TrendConfirmation(cfg) => Self::evaluate_trend(candles, cfg),
            Strategy::MultiTimeframe(cfg) => Self::evaluate_multi_timeframe(candles, confirm, cfg),
        }
    }

    fn evaluate_trend(candles: &[Candle], cfg: &TrendConfirmationConfig) -> Signal {
        match calculate_atr(candles, ATR_PERIOD) {
            Some(atr) if atr >= cfg.min_atr => {}
            _ => return Signal::Neutral,
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let ema_fast = ema_series(&closes, EMA_FAST_SPAN);
        let ema_slow = ema_series(&closes, EMA_SLOW_SPAN);

        let n = closes.len();
        let window = cfg.confirm_bars.clamp(1, n);
        let buy_confirm = (n - window..n).all(|i| ema_fast[i] > ema_slow[i]);
        let sell_confirm = (n - window..n).all(|i| ema_fast[i] < ema_slow[i]);

        let slope = ema_fast[n - 1] - ema_fast[n - 2];
        let price = closes[n - 1];
        let slow_now = ema_slow[n - 1];
        let denom = if slow_now != 0.0 { slow_now.abs() } else { 1.0 };
        let gap = (price - slow_now).abs() / denom;

        if buy_confirm && slope > 0.0 && price > slow_now && gap > cfg.min_gap {
            Signal::Buy
        } else if sell_confirm && slope < 0.0 && price < slow_now && gap > cfg.min_gap {
            Signal::Sell
        } else {
            Signal::Neutral
        }
    }

    fn evaluate_multi_timeframe(
        candles: &[Candle],
        confirm: Option<&[Candle]>,
        cfg: &MultiTimeframeConfig,
    ) -> Signal {
        let confirm = match confirm {
            Some(frame) if frame.len() >= EMA_SLOW_SPAN => frame,
            _ => return Signal::Neutral,
        };

        // Overbought/oversold guard: never chase an exhausted move.
        let rsi = match calculate_rsi(candles, RSI_PERIOD) {
            Some(value) => value,
            None => return Signal::Neutral,
        };
        if rsi > cfg.rsi_overbought || rsi < cfg.rsi_oversold {
            return Signal::Neutral;
        }

        let (Some(fast_fast), Some(fast_slow), Some(high_fast), Some(high_slow)) = (
            calculate_ema(candles, EMA_FAST_SPAN),
            calculate_ema(candles, EMA_SLOW_SPAN),
            calculate_ema(confirm, EMA_FAST_SPAN),
            calculate_ema(confirm, EMA_SLOW_SPAN),
        ) else {
            return Signal::Neutral;
        };

        let n = candles.len();
        let prev_close = candles[n - 2].close;
        if prev_close == 0.0 {
            return Signal::Neutral;
        }
        let change = (candles[n - 1].close - prev_close) / prev_close;
        if change.abs() < cfg.min_change {
            return Signal::Neutral;
        }

        let volume_avg: f64 = candles[n - VOLUME_LOOKBACK..n]
            .iter()
            .map(|c| c.volume)
            .sum::<f64>()
            / VOLUME_LOOKBACK as f64;
        if candles[n - 1].volume <= volume_avg {
            return Signal::Neutral;
        }

        let fast_up = fast_fast > fast_slow;
        let fast_down = fast_fast < fast_slow;
        let high_up = high_fast > high_slow;
        let high_down = high_fast < high_slow;

        if fast_up && change > 0.0 && high_up {
            Signal::Buy
        } else if fast_down && change < 0.0 && high_down {
            Signal::Sell
        } else {
            Signal::Neutral
        }
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(Strategy::default())
    }
}
