//! The periodic signal-computation loop.
//!
//! One pass fetches each asset's candle window, classifies it, runs the
//! result through the cooldown gate, and hands admitted signals to the
//! history store and a spawned delivery task. No failure in a single
//! asset's evaluation aborts the pass, and nothing here is fatal to the
//! loop itself.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::metrics::Metrics;
use crate::models::market::Asset;
use crate::models::signal::{Signal, SignalRecord};
use crate::services::market_data::MarketDataProvider;
use crate::services::notifier::{Notifier, NotifyError};
use crate::signals::cooldown::CooldownGate;
use crate::signals::engine::{SignalEngine, MIN_CANDLES};
use crate::signals::history::SignalHistory;

/// Floor for the inter-pass sleep so an over-long pass never rolls straight
/// into the next one.
const MIN_IDLE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub interval: Duration,
    /// Delay between assets within a pass, to respect provider rate limits.
    pub pacing_delay: Duration,
    /// Two-phase delivery delay; `None` sends a single message.
    pub confirm_delay: Option<Duration>,
    pub primary_interval: String,
    pub confirm_interval: String,
    pub lookback_range: String,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            pacing_delay: Duration::from_millis(250),
            confirm_delay: None,
            primary_interval: "1m".to_string(),
            confirm_interval: "5m".to_string(),
            lookback_range: "2d".to_string(),
        }
    }
}

pub struct SignalPoller {
    assets: Vec<Asset>,
    engine: SignalEngine,
    provider: Arc<dyn MarketDataProvider>,
    gate: Arc<CooldownGate>,
    history: Arc<SignalHistory>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<Metrics>,
    settings: PollerSettings,
}

impl SignalPoller {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        assets: Vec<Asset>,
        engine: SignalEngine,
        provider: Arc<dyn MarketDataProvider>,
        gate: Arc<CooldownGate>,
        history: Arc<SignalHistory>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<Metrics>,
        settings: PollerSettings,
    ) -> Self {
        Self {
            assets,
            engine,
            provider,
            gate,
            history,
            notifier,
            metrics,
            settings,
        }
    }

    /// Drive passes forever, sleeping only the remainder of the interval
    /// after each pass. Never returns.
    pub async fn run(&self) {
        info!(
            assets = self.assets.len(),
            interval_secs = self.settings.interval.as_secs(),
            "signal poller started"
        );

        loop {
            let started = Instant::now();
            self.run_pass().await;
            let elapsed = started.elapsed();
            let idle = self
                .settings
                .interval
                .checked_sub(elapsed)
                .unwrap_or(MIN_IDLE)
                .max(MIN_IDLE);
            debug!(
                pass_ms = elapsed.as_millis() as u64,
                idle_ms = idle.as_millis() as u64,
                "pass complete"
            );
            sleep(idle).await;
        }
    }

    /// One full pass over the configured assets.
    pub async fn run_pass(&self) {
        for asset in &self.assets {
            self.evaluate_asset(asset).await;
            if !self.settings.pacing_delay.is_zero() {
                sleep(self.settings.pacing_delay).await;
            }
        }
        self.metrics.poll_passes_total.inc();
    }

    async fn evaluate_asset(&self, asset: &Asset) {
        let candles = match self
            .provider
            .fetch_candles(
                &asset.symbol,
                &self.settings.primary_interval,
                &self.settings.lookback_range,
            )
            .await
        {
            Ok(candles) => candles,
            Err(error) => {
                self.metrics.fetch_failures_total.inc();
                debug!(asset = %asset.name, %error, "fetch failed, skipping cycle");
                return;
            }
        };

        if candles.len() < MIN_CANDLES {
            self.metrics.fetch_failures_total.inc();
            debug!(
                asset = %asset.name,
                bars = candles.len(),
                min = MIN_CANDLES,
                "not enough bars, skipping cycle"
            );
            return;
        }

        let confirm = if self.engine.needs_confirmation_frame() {
            match self
                .provider
                .fetch_candles(
                    &asset.symbol,
                    &self.settings.confirm_interval,
                    &self.settings.lookback_range,
                )
                .await
            {
                Ok(frame) => Some(frame),
                Err(error) => {
                    self.metrics.fetch_failures_total.inc();
                    debug!(asset = %asset.name, %error, "confirmation fetch failed, skipping cycle");
                    return;
                }
            }
        } else {
            None
        };

        let signal = self.engine.evaluate(&candles, confirm.as_deref());
        if !signal.is_actionable() {
            debug!(asset = %asset.name, "no signal this cycle");
            return;
        }

        let now = Utc::now();
        if !self.gate.admit(&asset.name, signal, now).await {
            self.metrics.signals_suppressed_total.inc();
            debug!(asset = %asset.name, signal = %signal, "suppressed by cooldown gate");
            return;
        }

        self.history
            .record(SignalRecord::new(&asset.name, signal, now))
            .await;
        self.metrics.signals_emitted_total.inc();
        info!(asset = %asset.name, signal = %signal, "signal emitted");

        self.dispatch_notification(asset.name.clone(), signal, now);
    }

    /// Fire-and-forget delivery unit. The optional two-phase confirm delay
    /// runs inside the spawned task, never on the poll loop; a delivery
    /// failure does not roll back the gate transition.
    fn dispatch_notification(&self, asset: String, signal: Signal, at: DateTime<Utc>) {
        if !self.notifier.is_enabled() {
            debug!(asset = %asset, "notifier disabled, skipping dispatch");
            return;
        }

        let notifier = self.notifier.clone();
        let metrics = self.metrics.clone();
        let confirm_delay = self.settings.confirm_delay;

        tokio::spawn(async move {
            let title = format!("{} - {}", asset, signal);
            let stamp = at.format("%Y-%m-%d %H:%M:%S");
            match confirm_delay {
                Some(delay) => {
                    let prepare = notifier
                        .send(&title, &format!("Get ready: {} {} @ {}", signal, asset, stamp))
                        .await;
                    record_delivery(&metrics, &asset, prepare);
                    sleep(delay).await;
                    let confirm = notifier
                        .send(&title, &format!("Enter now: {} {}", signal, asset))
                        .await;
                    record_delivery(&metrics, &asset, confirm);
                }
                None => {
                    let outcome = notifier
                        .send(&title, &format!("Signal: {} for {} @ {}", signal, asset, stamp))
                        .await;
                    record_delivery(&metrics, &asset, outcome);
                }
            }
        });
    }
}

fn record_delivery(metrics: &Metrics, asset: &str, outcome: Result<(), NotifyError>) {
    match outcome {
        Ok(()) => {
            metrics.notifications_sent_total.inc();
        }
        Err(error) => {
            metrics.notifications_failed_total.inc();
            warn!(asset, %error, "push delivery failed");
        }
    }
}
