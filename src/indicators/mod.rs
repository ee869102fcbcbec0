//! Technical indicator calculations over candle windows.

pub mod momentum;
pub mod trend;
pub mod volatility;

pub use momentum::calculate_rsi;
pub use trend::{calculate_ema, ema_series};
pub use volatility::{calculate_atr, true_range};
