//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define relay metrics (requests, latency, outcomes)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by method, outcome, status
//! - `relay_request_duration_seconds` (histogram): end-to-end relay latency
//! - `completion_requests_total` (counter): completion calls by endpoint, outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished relay call.
pub fn record_relay(method: &'static str, outcome: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "relay_requests_total",
        "method" => method,
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("relay_request_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

/// Record one finished completion call.
pub fn record_completion(endpoint: &'static str, outcome: &'static str) {
    ::metrics::counter!(
        "completion_requests_total",
        "endpoint" => endpoint,
        "outcome" => outcome
    )
    .increment(1);
}
