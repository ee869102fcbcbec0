//! Per-asset dedup/cooldown gate.
//!
//! Suppresses repeated signals for an asset inside a cooldown window. The
//! state map is built once from the configured asset set (exactly one entry
//! per asset, never grown or destroyed) and each entry carries its own lock,
//! so concurrent notification units for different assets never contend.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::market::Asset;
use crate::models::signal::Signal;

/// When a repeat signal may pass the gate.
///
/// Both observed deployments expire on elapsed time; one additionally
/// requires the signal value to differ from the previous emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownPolicy {
    pub window: Duration,
    pub require_value_change: bool,
}

impl CooldownPolicy {
    /// Admit again once the window has elapsed, regardless of value.
    pub fn expiry_only(window_secs: i64) -> Self {
        Self {
            window: Duration::seconds(window_secs),
            require_value_change: false,
        }
    }

    /// Admit again only after the window has elapsed AND the value changed.
    pub fn expiry_and_change(window_secs: i64) -> Self {
        Self {
            window: Duration::seconds(window_secs),
            require_value_change: true,
        }
    }
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self::expiry_and_change(120)
    }
}

#[derive(Debug, Default)]
struct AssetState {
    last_signal: Option<Signal>,
    last_notified: Option<DateTime<Utc>>,
}

/// Gate deciding whether a classified signal becomes an emission.
pub struct CooldownGate {
    policy: CooldownPolicy,
    states: HashMap<String, Mutex<AssetState>>,
}

impl CooldownGate {
    pub fn new<'a>(assets: impl IntoIterator<Item = &'a Asset>, policy: CooldownPolicy) -> Self {
        let states = assets
            .into_iter()
            .map(|asset| (asset.name.clone(), Mutex::new(AssetState::default())))
            .collect();
        Self { policy, states }
    }

    /// Decide whether `signal` may be emitted for `asset` at `now`,
    /// transitioning the per-asset state in the same critical section when
    /// admitted. A downstream delivery failure does not roll this back.
    pub async fn admit(&self, asset: &str, signal: Signal, now: DateTime<Utc>) -> bool {
        if !signal.is_actionable() {
            return false;
        }
        let Some(slot) = self.states.get(asset) else {
            debug!(asset, "cooldown gate has no entry for asset, rejecting");
            return false;
        };

        let mut state = slot.lock().await;
        let admitted = match state.last_notified {
            None => true,
            Some(last) => {
                let expired = now - last > self.policy.window;
                let changed = state.last_signal != Some(signal);
                expired && (!self.policy.require_value_change || changed)
            }
        };

        if admitted {
            state.last_signal = Some(signal);
            state.last_notified = Some(now);
        }
        admitted
    }

    /// Last emitted signal for an asset, if any.
    pub async fn last_signal(&self, asset: &str) -> Option<Signal> {
        match self.states.get(asset) {
            Some(slot) => slot.lock().await.last_signal,
            None => None,
        }
    }

    pub fn policy(&self) -> &CooldownPolicy {
        &self.policy
    }

    pub fn asset_count(&self) -> usize {
        self.states.len()
    }
}
