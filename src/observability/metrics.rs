//! Metrics collection and exposition.
//!
//! # Metrics
//! - `harness_requests_total` (counter): counted API hits by namespace
//! - `harness_dispatch_outcomes_total` (counter): request outcomes by label
//! - `harness_breaker_trips_total` (counter): circuit breaker activations
//!
//! # Design Decisions
//! - Low-overhead updates (atomic counters behind the `metrics` macros)
//! - Prometheus exporter runs on its own address, separate from the API

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            metrics::describe_counter!(
                "harness_requests_total",
                "Counted API hits by traffic namespace"
            );
            metrics::describe_counter!(
                "harness_dispatch_outcomes_total",
                "Synthetic request outcomes by classification"
            );
            metrics::describe_counter!(
                "harness_breaker_trips_total",
                "Circuit breaker activations"
            );
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Count one API hit in the given traffic namespace.
pub fn record_hit(namespace: &str) {
    metrics::counter!("harness_requests_total", "namespace" => namespace.to_string())
        .increment(1);
}

/// Count one terminal request outcome.
pub fn record_outcome(label: &'static str) {
    metrics::counter!("harness_dispatch_outcomes_total", "outcome" => label).increment(1);
}

/// Count one circuit breaker activation.
pub fn record_breaker_trip() {
    metrics::counter!("harness_breaker_trips_total").increment(1);
}
