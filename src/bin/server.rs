//! Pipwatch Signal Engine Server
//!
//! Runs the polling loop and the read-only HTTP API in one process.

use dotenvy::dotenv;
use pipwatch::config::{get_environment, Config};
use pipwatch::core::http::{start_server, AppState};
use pipwatch::core::poller::{PollerSettings, SignalPoller};
use pipwatch::logging;
use pipwatch::metrics::Metrics;
use pipwatch::services::market_data::MarketDataProvider;
use pipwatch::services::notifier::{DisabledNotifier, Notifier, PushoverNotifier};
use pipwatch::services::yahoo::YahooFinanceProvider;
use pipwatch::signals::cooldown::CooldownGate;
use pipwatch::signals::engine::SignalEngine;
use pipwatch::signals::history::SignalHistory;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    // Initialize logging based on environment
    logging::init_logging();

    let config = Config::from_env();
    let env = get_environment();

    info!("Starting Pipwatch Signal Engine");
    info!(environment = %env, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);
    info!(
        interval = config.poll_interval.as_secs(),
        assets = config.assets.len(),
        "Signal evaluation: every {}s across {} assets",
        config.poll_interval.as_secs(),
        config.assets.len()
    );

    let metrics = Arc::new(Metrics::new()?);

    let notifier: Arc<dyn Notifier> = match &config.pushover {
        Some(credentials) => {
            info!("Push notifications enabled");
            Arc::new(PushoverNotifier::new(
                credentials.token.clone(),
                credentials.user.clone(),
            ))
        }
        None => {
            warn!("PUSHOVER_TOKEN/PUSHOVER_USER not set - notifications disabled");
            Arc::new(DisabledNotifier)
        }
    };

    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooFinanceProvider::new());
    let history = Arc::new(SignalHistory::new(config.history_cap));
    let gate = Arc::new(CooldownGate::new(&config.assets, config.cooldown.clone()));
    let engine = SignalEngine::new(config.strategy.clone());

    let state = AppState {
        assets: Arc::new(config.assets.clone()),
        history: history.clone(),
        provider: provider.clone(),
        notifier: notifier.clone(),
        metrics: metrics.clone(),
        start_time: Arc::new(Instant::now()),
        chart_interval: config.primary_interval.clone(),
        chart_range: config.lookback_range.clone(),
    };

    let port = config.port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    let poller = SignalPoller::new(
        config.assets.clone(),
        engine,
        provider,
        gate,
        history,
        notifier,
        metrics,
        PollerSettings {
            interval: config.poll_interval,
            pacing_delay: config.pacing_delay,
            confirm_delay: config.confirm_delay,
            primary_interval: config.primary_interval.clone(),
            confirm_interval: config.confirm_interval.clone(),
            lookback_range: config.lookback_range.clone(),
        },
    );
    let poller_handle = tokio::spawn(async move {
        poller.run().await;
    });

    info!("Server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
        _ = poller_handle => {
            error!("Signal poller stopped");
        }
    }

    Ok(())
}
