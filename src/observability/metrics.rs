//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by endpoint, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_submissions_total` (counter): transactions by function, outcome
//! - `gateway_network_connected` (gauge): 1=RPC reachable, 0=not
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Exporter is optional; recording into an uninstalled recorder is a no-op

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::blockchain::types::TxStatus;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled HTTP request.
pub fn record_request(endpoint: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "endpoint" => endpoint.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a confirmed transaction submission.
pub fn record_submission(function: &'static str, status: TxStatus) {
    metrics::counter!(
        "gateway_submissions_total",
        "function" => function,
        "status" => status.as_str()
    )
    .increment(1);
}

/// Record the on-demand connectivity probe result.
pub fn record_network_health(connected: bool) {
    metrics::gauge!("gateway_network_connected").set(if connected { 1.0 } else { 0.0 });
}
