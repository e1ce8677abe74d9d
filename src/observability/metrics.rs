//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_auctions_total` (counter): auctions by outcome
//! - `proxy_auction_duration_seconds` (histogram): end-to-end auction latency
//! - `proxy_recipient_calls_total` (counter): recipient calls by recipient, outcome
//! - `proxy_bids_collected` (histogram): replies collected per auction
//! - `proxy_diagnostics_recorded_total` (counter): entries written to the ring
//!
//! # Design Decisions
//! - Updates go through the `metrics` facade; without an installed recorder
//!   they are no-ops, which keeps tests and tools free of exporter setup
//! - Prometheus exposition is optional and bound to its own address

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_auction(outcome: &'static str, start: Instant) {
    counter!("proxy_auctions_total", "outcome" => outcome).increment(1);
    histogram!("proxy_auction_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_recipient_call(recipient: &str, outcome: &'static str) {
    counter!(
        "proxy_recipient_calls_total",
        "recipient" => recipient.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_bids_collected(count: usize) {
    histogram!("proxy_bids_collected").record(count as f64);
}

pub fn record_diagnostic() {
    counter!("proxy_diagnostics_recorded_total").increment(1);
}
