//! Integration tests for the HTTP API surface

use axum::http::StatusCode;
use chrono::Utc;
use pipwatch::models::signal::{Signal, SignalRecord};
use serde_json::Value;

use crate::test_utils::TestApp;

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let app = TestApp::new().await;
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn metrics_endpoint_exports_engine_counters() {
    let app = TestApp::new().await;
    let response = app.server.get("/metrics").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("poll_passes_total"));
    assert!(body.contains("signals_emitted_total"));
    assert!(body.contains("http_requests_total"));
}

#[tokio::test]
async fn signals_snapshot_lists_configured_assets() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/signals").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["EUR/USD"].is_null());

    app.history
        .record(SignalRecord::new("EUR/USD", Signal::Buy, Utc::now()))
        .await;

    let response = app.server.get("/api/signals").await;
    let body: Value = response.json();
    assert_eq!(body["EUR/USD"], "BUY");
}

#[tokio::test]
async fn history_endpoint_serves_newest_first() {
    let app = TestApp::new().await;
    let t0 = Utc::now();
    app.history
        .record(SignalRecord::new("EUR/USD", Signal::Buy, t0))
        .await;
    app.history
        .record(SignalRecord::new(
            "EUR/USD",
            Signal::Sell,
            t0 + chrono::Duration::seconds(200),
        ))
        .await;

    let response = app.server.get("/api/history").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let records = body.as_array().expect("history array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["signal"], "SELL");
    assert_eq!(records[1]["signal"], "BUY");

    let limited = app.server.get("/api/history").add_query_param("limit", 1).await;
    let body: Value = limited.json();
    assert_eq!(body.as_array().expect("history array").len(), 1);
}

#[tokio::test]
async fn indicator_series_recomputed_on_demand() {
    let app = TestApp::new().await;
    let response = app
        .server
        .get("/api/indicators")
        .add_query_param("asset", "EUR/USD")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["asset"], "EUR/USD");
    assert_eq!(body["close"].as_array().expect("close series").len(), 25);
    assert_eq!(
        body["ema_fast"].as_array().expect("ema series").len(),
        25
    );
    assert!(body["rsi"].is_number());
    assert!(body["atr"].is_number());
}

#[tokio::test]
async fn indicator_series_unknown_asset_is_404() {
    let app = TestApp::new().await;
    let response = app
        .server
        .get("/api/indicators")
        .add_query_param("asset", "XAU/USD")
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_push_unavailable_when_credentials_missing() {
    let app = TestApp::new().await;
    let response = app.server.post("/api/push/test").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
