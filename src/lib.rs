//! Pipwatch — trend-following FX signal engine.
//!
//! Polls currency price feeds on a fixed cadence, derives EMA/RSI/ATR
//! indicators, classifies BUY/SELL signals, deduplicates them through a
//! per-asset cooldown gate, and dispatches push notifications. A read-only
//! HTTP API exposes the latest signal snapshot, the bounded signal history,
//! and on-demand indicator series for charting.

pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
