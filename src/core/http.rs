//! HTTP endpoint server using Axum
//!
//! Read-only surface over the engine's state: latest signal snapshot,
//! bounded history, on-demand indicator series, plus health/metrics and a
//! manual test push. Presentation layers (web or desktop) consume these;
//! nothing here mutates engine state.

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::metrics::Metrics;
use crate::models::indicators::IndicatorSeries;
use crate::models::market::Asset;
use crate::services::market_data::MarketDataProvider;
use crate::services::notifier::Notifier;
use crate::signals::engine::{EMA_FAST_SPAN, EMA_SLOW_SPAN};
use crate::signals::history::{SignalHistory, DISPLAY_LIMIT};

#[derive(Clone)]
pub struct AppState {
    pub assets: Arc<Vec<Asset>>,
    pub history: Arc<SignalHistory>,
    pub provider: Arc<dyn MarketDataProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub chart_interval: String,
    pub chart_range: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Json(json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "service": "pipwatch-signal-engine"
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis() as u64,
            "HTTP request error"
        );
    }

    response
}

/// Latest emitted signal per configured asset; `null` before any emission.
async fn latest_signals(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.history.snapshot().await;
    let map: serde_json::Map<String, Value> = state
        .assets
        .iter()
        .map(|asset| {
            let value = snapshot
                .get(&asset.name)
                .map(|signal| json!(signal))
                .unwrap_or(Value::Null);
            (asset.name.clone(), value)
        })
        .collect();
    Json(Value::Object(map))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

/// Recent emissions, newest first, bounded by the retention cap.
async fn recent_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Json<Vec<crate::models::signal::SignalRecord>> {
    let limit = params
        .limit
        .unwrap_or(DISPLAY_LIMIT)
        .min(state.history.cap());
    Json(state.history.recent(limit).await)
}

#[derive(Debug, Deserialize)]
struct ChartQuery {
    asset: String,
}

/// On-demand recomputation of a chart-ready indicator series for one asset.
/// Asset names contain `/`, so the name travels as a query parameter.
async fn indicator_series(
    State(state): State<AppState>,
    Query(params): Query<ChartQuery>,
) -> Result<Json<IndicatorSeries>, StatusCode> {
    let asset = state
        .assets
        .iter()
        .find(|asset| asset.name == params.asset)
        .ok_or(StatusCode::NOT_FOUND)?;

    let candles = state
        .provider
        .fetch_candles(&asset.symbol, &state.chart_interval, &state.chart_range)
        .await
        .map_err(|e| {
            error!(asset = %asset.name, error = %e, "chart fetch failed");
            StatusCode::SERVICE_UNAVAILABLE
        })?;

    if candles.is_empty() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(IndicatorSeries::from_candles(
        &asset.name,
        &candles,
        EMA_FAST_SPAN,
        EMA_SLOW_SPAN,
    )))
}

/// Manual delivery check against the configured push endpoint.
async fn test_push(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    if !state.notifier.is_enabled() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    state
        .notifier
        .send("Test", "Test notification from pipwatch")
        .await
        .map_err(|e| {
            error!(error = %e, "test push failed");
            StatusCode::BAD_GATEWAY
        })?;
    Ok(Json(json!({ "status": "sent" })))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signals", get(latest_signals))
        .route("/api/history", get(recent_history))
        .route("/api/indicators", get(indicator_series))
        .route("/api/push/test", post(test_push))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
