//! EMA (Exponential Moving Average) indicator

use crate::models::market::Candle;

/// Full EMA series aligned to the input, seeded from the first observation.
///
/// Weighting factor is `2 / (span + 1)`; each value follows
/// `ema[t] = alpha * price[t] + (1 - alpha) * ema[t-1]`.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    if values.is_empty() || span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut series = Vec::with_capacity(values.len());
    let mut ema = values[0];
    series.push(ema);
    for &value in &values[1..] {
        ema = alpha * value + (1.0 - alpha) * ema;
        series.push(ema);
    }
    series
}

/// Latest EMA value over candle closes for a specific span.
pub fn calculate_ema(candles: &[Candle], span: usize) -> Option<f64> {
    if candles.len() < span {
        return None;
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    ema_series(&closes, span).last().copied()
}
