//! Startup configuration read once from the environment.
//!
//! Nothing here participates in runtime logic; components receive plain
//! values. Missing push credentials disable notifications rather than
//! failing startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::models::market::Asset;
use crate::signals::cooldown::CooldownPolicy;
use crate::signals::engine::{MultiTimeframeConfig, Strategy, TrendConfirmationConfig};

/// Deployment environment name, used to pick the log format.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn is_production() -> bool {
    matches!(get_environment().as_str(), "production" | "prod")
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.parse().ok())
}

#[derive(Debug, Clone)]
pub struct PushoverCredentials {
    pub token: String,
    pub user: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub assets: Vec<Asset>,
    pub poll_interval: Duration,
    pub pacing_delay: Duration,
    pub cooldown: CooldownPolicy,
    pub strategy: Strategy,
    pub history_cap: usize,
    pub pushover: Option<PushoverCredentials>,
    /// Two-phase delivery delay; `None` sends a single message.
    pub confirm_delay: Option<Duration>,
    pub port: u16,
    pub primary_interval: String,
    pub confirm_interval: String,
    pub lookback_range: String,
}

impl Config {
    /// Build the configuration from the process environment. Never fails;
    /// every knob has a default and malformed values fall back to it.
    pub fn from_env() -> Self {
        let strategy = match env::var("STRATEGY").ok().as_deref() {
            Some("multi_timeframe") | Some("mtf") => {
                let defaults = MultiTimeframeConfig::default();
                Strategy::MultiTimeframe(MultiTimeframeConfig {
                    min_change: env_parse("MIN_PRICE_CHANGE").unwrap_or(defaults.min_change),
                    rsi_overbought: env_parse("RSI_OVERBOUGHT").unwrap_or(defaults.rsi_overbought),
                    rsi_oversold: env_parse("RSI_OVERSOLD").unwrap_or(defaults.rsi_oversold),
                })
            }
            _ => {
                let defaults = TrendConfirmationConfig::default();
                Strategy::TrendConfirmation(TrendConfirmationConfig {
                    confirm_bars: env_parse("CONFIRM_BARS").unwrap_or(defaults.confirm_bars),
                    min_gap: env_parse("MIN_GAP").unwrap_or(defaults.min_gap),
                    min_atr: env_parse("MIN_ATR").unwrap_or(defaults.min_atr),
                })
            }
        };

        let cooldown = CooldownPolicy {
            window: chrono::Duration::seconds(env_parse("COOLDOWN_SECONDS").unwrap_or(120)),
            require_value_change: env_parse("COOLDOWN_REQUIRE_CHANGE").unwrap_or(true),
        };

        let pushover = match (env::var("PUSHOVER_TOKEN"), env::var("PUSHOVER_USER")) {
            (Ok(token), Ok(user)) if !token.is_empty() && !user.is_empty() => {
                Some(PushoverCredentials { token, user })
            }
            _ => None,
        };

        let assets = env::var("ASSETS")
            .ok()
            .map(|raw| parse_assets(&raw))
            .filter(|assets| !assets.is_empty())
            .unwrap_or_else(default_assets);

        Self {
            assets,
            poll_interval: Duration::from_secs(env_parse("POLL_INTERVAL_SECONDS").unwrap_or(60)),
            pacing_delay: Duration::from_millis(env_parse("ASSET_PACING_MS").unwrap_or(250)),
            cooldown,
            strategy,
            history_cap: env_parse("HISTORY_CAP")
                .unwrap_or(crate::signals::history::DEFAULT_RETENTION),
            pushover,
            confirm_delay: env_parse::<u64>("NOTIFY_CONFIRM_DELAY_SECONDS")
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs),
            port: env_parse("PORT").unwrap_or(8080),
            primary_interval: env::var("PRIMARY_INTERVAL").unwrap_or_else(|_| "1m".to_string()),
            confirm_interval: env::var("CONFIRM_INTERVAL").unwrap_or_else(|_| "5m".to_string()),
            lookback_range: env::var("LOOKBACK_RANGE").unwrap_or_else(|_| "2d".to_string()),
        }
    }
}

/// The tracked currency pairs when `ASSETS` is not set.
pub fn default_assets() -> Vec<Asset> {
    vec![
        Asset::new("EUR/USD", "EURUSD=X"),
        Asset::new("GBP/USD", "GBPUSD=X"),
        Asset::new("USD/JPY", "USDJPY=X"),
        Asset::new("GBP/JPY", "GBPJPY=X"),
        Asset::new("AUD/USD", "AUDUSD=X"),
        Asset::new("USD/CHF", "CHFUSD=X"),
        Asset::new("NZD/USD", "NZDUSD=X"),
    ]
}

/// Parse `NAME:SYMBOL;NAME:SYMBOL` pairs, skipping malformed entries.
/// Provider symbols may themselves contain `=`, hence the `:` separator.
fn parse_assets(raw: &str) -> Vec<Asset> {
    raw.split(';')
        .filter_map(|entry| {
            let (name, symbol) = entry.split_once(':')?;
            let name = name.trim();
            let symbol = symbol.trim();
            if name.is_empty() || symbol.is_empty() {
                None
            } else {
                Some(Asset::new(name, symbol))
            }
        })
        .collect()
}
