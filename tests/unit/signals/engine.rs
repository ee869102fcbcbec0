//! Unit tests for the signal classifier

use chrono::Utc;
use pipwatch::models::market::Candle;
use pipwatch::models::signal::Signal;
use pipwatch::signals::engine::{
    MultiTimeframeConfig, SignalEngine, Strategy, TrendConfirmationConfig, MIN_CANDLES,
};

fn trend_engine() -> SignalEngine {
    SignalEngine::new(Strategy::TrendConfirmation(
        TrendConfirmationConfig::default(),
    ))
}

fn mtf_engine() -> SignalEngine {
    SignalEngine::new(Strategy::MultiTimeframe(MultiTimeframeConfig::default()))
}

/// FX-scale bars rising 5 pips per minute.
fn rising_fx_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let close = 1.1000 + i as f64 * 0.0005;
            Candle::new(
                close - 0.0002,
                close + 0.0004,
                close - 0.0004,
                close,
                1000.0,
                Utc::now(),
            )
        })
        .collect()
}

fn falling_fx_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let close = 1.1000 - i as f64 * 0.0005;
            Candle::new(
                close + 0.0002,
                close + 0.0004,
                close - 0.0004,
                close,
                1000.0,
                Utc::now(),
            )
        })
        .collect()
}

fn candles_with_volume_spike(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let volume = if i == closes.len() - 1 { 2000.0 } else { 1000.0 };
            Candle::new(close, close + 0.3, close - 0.3, close, volume, Utc::now())
        })
        .collect()
}

/// Zigzag closes alternating between two signed deltas. An even `count`
/// ends on the `first` leg.
fn zigzag_closes(count: usize, start: f64, first: f64, second: f64) -> Vec<f64> {
    let mut closes = vec![start];
    for i in 1..count {
        let prev = closes[i - 1];
        closes.push(if i % 2 == 1 { prev + first } else { prev + second });
    }
    closes
}

#[test]
fn warmup_window_classifies_neutral() {
    let short = rising_fx_candles(MIN_CANDLES - 1);
    assert_eq!(trend_engine().evaluate(&short, None), Signal::Neutral);
    let confirm = rising_fx_candles(40);
    assert_eq!(
        mtf_engine().evaluate(&short, Some(&confirm)),
        Signal::Neutral
    );
}

#[test]
fn empty_window_classifies_neutral() {
    assert_eq!(trend_engine().evaluate(&[], None), Signal::Neutral);
    assert_eq!(mtf_engine().evaluate(&[], None), Signal::Neutral);
}

#[test]
fn trend_buy_on_confirmed_uptrend() {
    let candles = rising_fx_candles(25);
    assert_eq!(trend_engine().evaluate(&candles, None), Signal::Buy);
}

#[test]
fn trend_sell_on_confirmed_downtrend() {
    let candles = falling_fx_candles(25);
    assert_eq!(trend_engine().evaluate(&candles, None), Signal::Sell);
}

#[test]
fn trend_skips_quiet_market_below_atr_floor() {
    // Zero-range bars: ATR is 0, below the floor, asset skipped.
    let candles: Vec<Candle> = (0..25)
        .map(|_| Candle::new(1.1, 1.1, 1.1, 1.1, 1000.0, Utc::now()))
        .collect();
    assert_eq!(trend_engine().evaluate(&candles, None), Signal::Neutral);
}

#[test]
fn trend_flat_market_classifies_neutral() {
    // Enough range to pass the ATR floor, but EMA5 never separates from
    // EMA20, so neither confirmation can hold.
    let candles: Vec<Candle> = (0..25)
        .map(|_| Candle::new(1.1, 1.1004, 1.0996, 1.1, 1000.0, Utc::now()))
        .collect();
    assert_eq!(trend_engine().evaluate(&candles, None), Signal::Neutral);
}

#[test]
fn trend_requires_minimum_gap() {
    let cfg = TrendConfirmationConfig {
        min_gap: 0.5,
        ..TrendConfirmationConfig::default()
    };
    let engine = SignalEngine::new(Strategy::TrendConfirmation(cfg));
    let candles = rising_fx_candles(25);
    assert_eq!(engine.evaluate(&candles, None), Signal::Neutral);
}

#[test]
fn mtf_buy_on_agreeing_timeframes() {
    // +0.2/-0.1 zigzag keeps RSI near 67, inside the neutral band, while
    // the net trend keeps EMA5 above EMA20 on both frames. The final bar
    // is an up leg with a volume spike.
    let primary = candles_with_volume_spike(&zigzag_closes(30, 100.0, 0.2, -0.1));
    let confirm = rising_fx_candles(40);
    assert_eq!(mtf_engine().evaluate(&primary, Some(&confirm)), Signal::Buy);
}

#[test]
fn mtf_sell_on_agreeing_downtrend() {
    // Mirror image: -0.2/+0.1 zigzag, RSI near 33, ending on the down leg.
    let primary = candles_with_volume_spike(&zigzag_closes(30, 100.0, -0.2, 0.1));
    let confirm = falling_fx_candles(40);
    assert_eq!(
        mtf_engine().evaluate(&primary, Some(&confirm)),
        Signal::Sell
    );
}

#[test]
fn mtf_rejects_overbought() {
    // +0.3/-0.1 zigzag puts RSI at exactly 75: overbought, rejected even
    // though every alignment condition favors a buy.
    let primary = candles_with_volume_spike(&zigzag_closes(30, 100.0, 0.3, -0.1));
    let confirm = rising_fx_candles(40);
    assert_eq!(
        mtf_engine().evaluate(&primary, Some(&confirm)),
        Signal::Neutral
    );
}

#[test]
fn mtf_requires_confirmation_frame() {
    let primary = candles_with_volume_spike(&zigzag_closes(30, 100.0, 0.2, -0.1));
    assert_eq!(mtf_engine().evaluate(&primary, None), Signal::Neutral);
    let short_confirm = rising_fx_candles(10);
    assert_eq!(
        mtf_engine().evaluate(&primary, Some(&short_confirm)),
        Signal::Neutral
    );
}

#[test]
fn mtf_rejects_disagreeing_slow_frame() {
    let primary = candles_with_volume_spike(&zigzag_closes(30, 100.0, 0.2, -0.1));
    let confirm = falling_fx_candles(40);
    assert_eq!(
        mtf_engine().evaluate(&primary, Some(&confirm)),
        Signal::Neutral
    );
}

#[test]
fn mtf_rejects_below_average_volume() {
    let mut primary = candles_with_volume_spike(&zigzag_closes(30, 100.0, 0.2, -0.1));
    if let Some(last) = primary.last_mut() {
        last.volume = 500.0;
    }
    let confirm = rising_fx_candles(40);
    assert_eq!(
        mtf_engine().evaluate(&primary, Some(&confirm)),
        Signal::Neutral
    );
}
