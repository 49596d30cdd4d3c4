//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_upstream_requests_total` (counter): dispatches by group, status
//! - `gateway_origin_rejected_total` (counter): admission rejections
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so tests and
//!   embedders that skip `init_metrics` cost nothing

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request at the gateway edge.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a dispatch to a resource service.
pub fn record_upstream(method: &str, status: u16, group: &str, start: Instant) {
    counter!(
        "gateway_upstream_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "group" => group.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_upstream_duration_seconds",
        "group" => group.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record an origin rejected by the admission policy.
pub fn record_origin_rejected() {
    counter!("gateway_origin_rejected_total").increment(1);
}
