//! ATR (Average True Range) indicator

use crate::models::market::Candle;

/// True range of a bar given the previous close.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Calculate ATR as the rolling mean of true range over `period` bars.
///
/// Returns `None` when fewer than `period + 1` candles are available
/// (true range needs a previous close).
pub fn calculate_atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let start = candles.len() - period;
    let sum: f64 = (start..candles.len())
        .map(|i| true_range(candles[i].high, candles[i].low, candles[i - 1].close))
        .sum();
    Some(sum / period as f64)
}
