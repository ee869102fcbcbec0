//! Signal evaluation, deduplication, and retention.

pub mod cooldown;
pub mod engine;
pub mod history;

pub use cooldown::{CooldownGate, CooldownPolicy};
pub use engine::{SignalEngine, Strategy, MIN_CANDLES};
pub use history::SignalHistory;
