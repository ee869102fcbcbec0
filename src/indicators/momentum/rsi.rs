//! RSI (Relative Strength Index) indicator
//!
//! RSI = 100 - (100 / (1 + RS))
//! RS = Average Gain / Average Loss

use crate::models::market::Candle;

/// Calculate RSI over the trailing `period` close deltas.
///
/// Returns `None` when fewer than `period` deltas exist. A zero average
/// loss reports 100 rather than dividing by zero.
pub fn calculate_rsi(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    let start = candles.len() - period - 1;
    for i in start + 1..candles.len() {
        let change = candles[i].close - candles[i - 1].close;
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum += change.abs();
        }
    }

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}
