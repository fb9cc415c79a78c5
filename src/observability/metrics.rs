//! Metrics collection and exposition.
//!
//! # Metrics
//! - `crypto_requests_total` (counter): API requests by operation, status
//! - `crypto_request_duration_seconds` (histogram): latency by operation
//! - `crypto_denied_total` (counter): requests rejected by the IP gate

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed API request.
pub fn record_request(operation: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "crypto_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "crypto_request_duration_seconds",
        "operation" => operation
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a request rejected by the IP restriction gate.
pub fn record_denied() {
    metrics::counter!("crypto_denied_total").increment(1);
}
