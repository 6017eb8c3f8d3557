//! Metrics collection and exposition.
//!
//! # Metrics
//! - `haproxy_control_compiles_total` (counter): compiles by outcome
//! - `haproxy_control_compile_duration_seconds` (histogram)
//! - `haproxy_control_reloads_total` (counter): start/reload by outcome
//! - `haproxy_control_services` (gauge): registered services
//!
//! Without an installed recorder every call is a no-op, so tests and the
//! one-shot CLI commands pay nothing.

use std::net::SocketAddr;
use std::time::Instant;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint. Requires a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_compile(outcome: &'static str, started: Instant) {
    counter!("haproxy_control_compiles_total", "outcome" => outcome).increment(1);
    histogram!("haproxy_control_compile_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_reload(action: &'static str, outcome: &'static str) {
    counter!("haproxy_control_reloads_total", "action" => action, "outcome" => outcome).increment(1);
}

pub fn record_service_count(count: usize) {
    gauge!("haproxy_control_services").set(count as f64);
}
