//! Trend-following indicators.

pub mod ema;

pub use ema::{calculate_ema, ema_series};
