//! Volatility measures.

pub mod atr;

pub use atr::{calculate_atr, true_range};
