//! Prometheus metrics for upstream latency and endpoint outcomes.
//!
//! This module provides metrics for:
//! - Upstream call latency, per API
//! - Upstream call outcomes (success, timeout, status, request, empty)
//! - Fetch endpoint responses by status code

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tracing::{debug, info};

use crate::upstream::UpstreamApi;

// === Metric Name Constants ===

/// Upstream call latency metric name.
pub const METRIC_UPSTREAM_LATENCY: &str = "upstream_request_latency_ms";
/// Upstream calls counter metric name.
pub const METRIC_UPSTREAM_REQUESTS: &str = "upstream_requests_total";
/// Fetch endpoint responses counter metric name.
pub const METRIC_FETCH_DATA_REQUESTS: &str = "fetch_data_requests_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_UPSTREAM_LATENCY,
        "Upstream API call latency in milliseconds"
    );
    describe_counter!(
        METRIC_UPSTREAM_REQUESTS,
        "Total number of upstream API calls by outcome"
    );
    describe_counter!(
        METRIC_FETCH_DATA_REQUESTS,
        "Total number of fetch-data responses by status code"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus exporter with an HTTP scrape listener.
pub fn install_exporter(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// Record upstream call latency.
pub fn record_upstream_latency(start: Instant, api: UpstreamApi) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_UPSTREAM_LATENCY, "api" => api.as_str()).record(latency_ms);
}

/// Increment upstream calls counter.
pub fn inc_upstream_requests(api: UpstreamApi, outcome: &'static str) {
    counter!(METRIC_UPSTREAM_REQUESTS, "api" => api.as_str(), "outcome" => outcome).increment(1);
}

/// Increment fetch endpoint responses counter.
pub fn inc_fetch_data_requests(status: u16) {
    counter!(METRIC_FETCH_DATA_REQUESTS, "status" => status.to_string()).increment(1);
}
