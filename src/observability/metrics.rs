//! Metrics collection and exposition.
//!
//! # Metrics
//! - `web_requests_total` (counter): requests by view and status
//! - `web_request_duration_seconds` (histogram): latency by view
//! - `web_route_reloads_total` (counter): route table reloads by outcome
//!
//! The `view` label is the matched view slug, or `none` for unmatched paths.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(view: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "web_requests_total",
        "view" => view,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("web_request_duration_seconds", "view" => view)
        .record(start.elapsed().as_secs_f64());
}

/// Record a route table reload attempt.
pub fn record_reload(success: bool) {
    let outcome = if success { "success" } else { "rejected" };
    metrics::counter!("web_route_reloads_total", "outcome" => outcome).increment(1);
}
