//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hello_watch_polls_total` (counter): poll outcomes by key
//! - `hello_config_updates_total` (counter): applied updates by field
//! - `hello_ttl_heartbeats_total` (counter): heartbeat outcomes
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus endpoint is opt-in

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_poll(key: &str, outcome: &'static str) {
    counter!("hello_watch_polls_total", "key" => key.to_string(), "outcome" => outcome).increment(1);
}

pub fn record_config_update(field: &'static str) {
    counter!("hello_config_updates_total", "field" => field).increment(1);
}

pub fn record_heartbeat(outcome: &'static str) {
    counter!("hello_ttl_heartbeats_total", "outcome" => outcome).increment(1);
}
