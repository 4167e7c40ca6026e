//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by endpoint, status
//! - `proxy_request_duration_seconds` (histogram): handler latency by endpoint
//! - `upstream_calls_total` (counter): upstream calls by api, outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one served request.
pub fn record_request(endpoint: &str, status: u16, start: Instant) {
    counter!(
        "proxy_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call outcome (`ok`, `status_error`, `transport_error`).
pub fn record_upstream_call(api: &'static str, outcome: &'static str) {
    counter!("upstream_calls_total", "api" => api, "outcome" => outcome).increment(1);
}
