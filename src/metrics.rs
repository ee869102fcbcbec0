//! Prometheus metrics for the poll loop, delivery path, and HTTP surface.

use prometheus::{Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
    pub poll_passes_total: IntCounter,
    pub signals_emitted_total: IntCounter,
    pub signals_suppressed_total: IntCounter,
    pub fetch_failures_total: IntCounter,
    pub notifications_sent_total: IntCounter,
    pub notifications_failed_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounter::with_opts(Opts::new(
            "http_requests_total",
            "Total HTTP requests served",
        ))?;
        let http_requests_in_flight = IntGauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "HTTP requests currently being served",
        ))?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let poll_passes_total = IntCounter::with_opts(Opts::new(
            "poll_passes_total",
            "Completed polling passes over the asset set",
        ))?;
        let signals_emitted_total = IntCounter::with_opts(Opts::new(
            "signals_emitted_total",
            "Signals admitted by the cooldown gate",
        ))?;
        let signals_suppressed_total = IntCounter::with_opts(Opts::new(
            "signals_suppressed_total",
            "Signals rejected by the cooldown gate",
        ))?;
        let fetch_failures_total = IntCounter::with_opts(Opts::new(
            "fetch_failures_total",
            "Market data fetches that returned no usable series",
        ))?;
        let notifications_sent_total = IntCounter::with_opts(Opts::new(
            "notifications_sent_total",
            "Push messages delivered successfully",
        ))?;
        let notifications_failed_total = IntCounter::with_opts(Opts::new(
            "notifications_failed_total",
            "Push messages that failed to deliver",
        ))?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(poll_passes_total.clone()))?;
        registry.register(Box::new(signals_emitted_total.clone()))?;
        registry.register(Box::new(signals_suppressed_total.clone()))?;
        registry.register(Box::new(fetch_failures_total.clone()))?;
        registry.register(Box::new(notifications_sent_total.clone()))?;
        registry.register(Box::new(notifications_failed_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            poll_passes_total,
            signals_emitted_total,
            signals_suppressed_total,
            fetch_failures_total,
            notifications_sent_total,
            notifications_failed_total,
        })
    }

    /// Prometheus text exposition of everything registered.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}
