//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_decisions_total` (counter): decisions by kind and outcome
//! - `router_decision_duration_seconds` (histogram): handler latency
//! - `router_table_reloads_total` (counter): reloads by table and result
//! - `router_table_ranges` (gauge): ranges in the published routing table
//!
//! # Design Decisions
//! - Recorded at the HTTP edge, not inside the decision pipeline
//! - Without an installed recorder every call is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::table::RoutingTable;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one decision. `kind` is `canister` or `random`.
pub fn record_decision(kind: &'static str, routed: bool, start: Instant) {
    let outcome = if routed { "routed" } else { "no_route" };
    metrics::counter!("router_decisions_total", "kind" => kind, "outcome" => outcome).increment(1);
    metrics::histogram!("router_decision_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_table_reload(table: &'static str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    metrics::counter!("router_table_reloads_total", "table" => table, "result" => result)
        .increment(1);
}

pub fn record_table_size(table: &RoutingTable) {
    metrics::gauge!("router_table_ranges").set(table.ranges().len() as f64);
}
