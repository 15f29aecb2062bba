//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by verb and outcome
//! - `router_dispatch_duration_seconds` (histogram): navigation to render
//! - `router_not_found_total` (counter): not-found renders by reason
//! - `router_view_load_total` (counter): template loads by result
//! - `router_view_load_duration_seconds` (histogram): template latency
//! - `router_form_stash_total` (counter): stash store/consume/parse_failure
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op
//! - Prometheus exporter only when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_dispatch(verb: &str, outcome: &'static str, start: Instant) {
    counter!("router_dispatch_total", "verb" => verb.to_string(), "outcome" => outcome)
        .increment(1);
    histogram!("router_dispatch_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_not_found(reason: &'static str) {
    counter!("router_not_found_total", "reason" => reason).increment(1);
}

pub fn record_view_load(result: &'static str, start: Instant) {
    counter!("router_view_load_total", "result" => result).increment(1);
    histogram!("router_view_load_duration_seconds", "result" => result)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_stash_event(event: &'static str) {
    counter!("router_form_stash_total", "event" => event).increment(1);
}
