//! Unit tests for the dedup/cooldown gate

use chrono::{Duration, Utc};
use pipwatch::models::market::Asset;
use pipwatch::models::signal::Signal;
use pipwatch::signals::cooldown::{CooldownGate, CooldownPolicy};

fn test_assets() -> Vec<Asset> {
    vec![
        Asset::new("EUR/USD", "EURUSD=X"),
        Asset::new("GBP/USD", "GBPUSD=X"),
    ]
}

#[tokio::test]
async fn first_signal_is_always_admitted() {
    let assets = test_assets();
    let gate = CooldownGate::new(&assets, CooldownPolicy::expiry_only(120));
    assert!(gate.admit("EUR/USD", Signal::Buy, Utc::now()).await);
}

#[tokio::test]
async fn identical_signal_within_window_is_suppressed() {
    let assets = test_assets();
    let gate = CooldownGate::new(&assets, CooldownPolicy::expiry_only(120));
    let t0 = Utc::now();
    assert!(gate.admit("EUR/USD", Signal::Buy, t0).await);
    assert!(!gate.admit("EUR/USD", Signal::Buy, t0 + Duration::seconds(10)).await);
}

#[tokio::test]
async fn identical_signal_after_window_is_admitted() {
    let assets = test_assets();
    let gate = CooldownGate::new(&assets, CooldownPolicy::expiry_only(120));
    let t0 = Utc::now();
    assert!(gate.admit("EUR/USD", Signal::Buy, t0).await);
    assert!(gate.admit("EUR/USD", Signal::Buy, t0 + Duration::seconds(130)).await);
}

#[tokio::test]
async fn value_change_policy_blocks_repeat_value_even_after_expiry() {
    let assets = test_assets();
    let gate = CooldownGate::new(&assets, CooldownPolicy::expiry_and_change(120));
    let t0 = Utc::now();
    assert!(gate.admit("EUR/USD", Signal::Buy, t0).await);
    // Window has elapsed but the value did not change.
    assert!(!gate.admit("EUR/USD", Signal::Buy, t0 + Duration::seconds(130)).await);
    // A flipped signal after expiry passes.
    assert!(gate.admit("EUR/USD", Signal::Sell, t0 + Duration::seconds(140)).await);
}

#[tokio::test]
async fn value_change_policy_still_enforces_window() {
    let assets = test_assets();
    let gate = CooldownGate::new(&assets, CooldownPolicy::expiry_and_change(120));
    let t0 = Utc::now();
    assert!(gate.admit("EUR/USD", Signal::Buy, t0).await);
    // Different value but inside the window: still suppressed.
    assert!(!gate.admit("EUR/USD", Signal::Sell, t0 + Duration::seconds(10)).await);
}

#[tokio::test]
async fn neutral_is_never_admitted() {
    let assets = test_assets();
    let gate = CooldownGate::new(&assets, CooldownPolicy::expiry_only(120));
    assert!(!gate.admit("EUR/USD", Signal::Neutral, Utc::now()).await);
    assert_eq!(gate.last_signal("EUR/USD").await, None);
}

#[tokio::test]
async fn unknown_asset_is_rejected() {
    let assets = test_assets();
    let gate = CooldownGate::new(&assets, CooldownPolicy::expiry_only(120));
    assert!(!gate.admit("XAU/USD", Signal::Buy, Utc::now()).await);
}

#[tokio::test]
async fn assets_do_not_interfere() {
    let assets = test_assets();
    let gate = CooldownGate::new(&assets, CooldownPolicy::expiry_and_change(120));
    assert_eq!(gate.asset_count(), 2);
    let t0 = Utc::now();
    assert!(gate.admit("EUR/USD", Signal::Buy, t0).await);
    // A fresh asset is unaffected by the other's cooldown.
    assert!(gate.admit("GBP/USD", Signal::Buy, t0 + Duration::seconds(1)).await);
    assert_eq!(gate.last_signal("EUR/USD").await, Some(Signal::Buy));
    assert_eq!(gate.last_signal("GBP/USD").await, Some(Signal::Buy));
}

#[tokio::test]
async fn rejection_does_not_mutate_state() {
    let assets = test_assets();
    let gate = CooldownGate::new(&assets, CooldownPolicy::expiry_and_change(120));
    let t0 = Utc::now();
    assert!(gate.admit("EUR/USD", Signal::Buy, t0).await);
    assert!(!gate.admit("EUR/USD", Signal::Sell, t0 + Duration::seconds(10)).await);
    // The suppressed SELL must not overwrite the last emitted value, or a
    // later SELL would be mistaken for a repeat.
    assert_eq!(gate.last_signal("EUR/USD").await, Some(Signal::Buy));
    assert!(gate.admit("EUR/USD", Signal::Sell, t0 + Duration::seconds(130)).await);
}
