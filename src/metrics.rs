//! Prometheus metrics for request counting and latency.
//!
//! Handlers stay metric-free: the [`track_requests`] middleware records one
//! counter increment and one latency sample per request. Without an installed
//! recorder the macros are no-ops, so the exporter is optional.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, info};

use crate::error::StartupError;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";

/// Route label used when no route matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_counter!(
        METRIC_HTTP_REQUESTS,
        "Total number of HTTP requests served"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder with its own HTTP listener.
pub fn install_exporter(addr: SocketAddr) -> Result<(), StartupError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| StartupError::Metrics(e.to_string()))?;

    info!("Prometheus exporter listening on {}", addr);
    Ok(())
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, method: &str, route: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "method" => method.to_string(),
        "path" => route.to_string()
    )
    .record(latency_ms);
}

/// Increment the request counter.
pub fn inc_http_requests(method: &str, route: &str, status: u16) {
    counter!(
        METRIC_HTTP_REQUESTS,
        "method" => method.to_string(),
        "path" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Middleware recording request count and latency per matched route.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    // Route templates keep label cardinality bounded.
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let response = next.run(request).await;

    record_http_latency(start, &method, &route);
    inc_http_requests(&method, &route, response.status().as_u16());

    response
}
