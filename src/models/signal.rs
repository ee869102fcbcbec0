//! Signal classification outcome and the emitted record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one classification pass for one asset.
///
/// `Neutral` means "no signal this cycle" and is never recorded in history
/// or pushed to the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Neutral,
}

impl Signal {
    /// Whether this outcome should flow past the classifier (BUY or SELL).
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::Neutral)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Neutral => write!(f, "NONE"),
        }
    }
}

/// One emitted signal, immutable once appended to the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub time: DateTime<Utc>,
    pub asset: String,
    pub signal: Signal,
}

impl SignalRecord {
    pub fn new(asset: impl Into<String>, signal: Signal, time: DateTime<Utc>) -> Self {
        Self {
            time,
            asset: asset.into(),
            signal,
        }
    }
}
