//! Bounded newest-first log of emitted signals.
//!
//! Also tracks the per-asset latest-signal snapshot the presentation layer
//! renders. Reads are safe concurrently with poll-loop appends.

use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

use crate::models::signal::{Signal, SignalRecord};

/// Records retained in memory.
pub const DEFAULT_RETENTION: usize = 500;
/// Default slice served to presentation reads.
pub const DISPLAY_LIMIT: usize = 50;

pub struct SignalHistory {
    cap: usize,
    records: RwLock<VecDeque<SignalRecord>>,
    latest: RwLock<HashMap<String, Signal>>,
}

impl SignalHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            records: RwLock::new(VecDeque::new()),
            latest: RwLock::new(HashMap::new()),
        }
    }

    /// Append a record at the front, evicting the oldest past the cap.
    pub async fn record(&self, record: SignalRecord) {
        {
            let mut latest = self.latest.write().await;
            latest.insert(record.asset.clone(), record.signal);
        }
        let mut records = self.records.write().await;
        records.push_front(record);
        records.truncate(self.cap);
    }

    /// Most recent records, newest first.
    pub async fn recent(&self, limit: usize) -> Vec<SignalRecord> {
        let records = self.records.read().await;
        records.iter().take(limit).cloned().collect()
    }

    /// Latest emitted signal per asset.
    pub async fn snapshot(&self) -> HashMap<String, Signal> {
        self.latest.read().await.clone()
    }

    pub async fn latest(&self, asset: &str) -> Option<Signal> {
        self.latest.read().await.get(asset).copied()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl Default for SignalHistory {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}
