//! Prometheus metrics facade.
//!
//! Thin wrappers around the `metrics` macros so handlers record counters
//! and durations through one vocabulary of metric names.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static PROMETHEUS: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder (once per process) and return a handle
/// for rendering the exposition text.
pub fn prometheus_handle() -> PrometheusHandle {
    PROMETHEUS
        .get_or_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .expect("Failed to install Prometheus recorder")
        })
        .clone()
}

/// Count a served request by endpoint and response status.
pub fn record_request(endpoint: &'static str, status: u16) {
    counter!(
        "rankrelay_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record how long a request took, from `start` until now.
pub fn record_duration(endpoint: &'static str, start: Instant) {
    histogram!("rankrelay_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Count a cache lookup outcome.
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("rankrelay_cache_lookups_total", "result" => result).increment(1);
}

/// Count a failed upstream fetch (transport, status, or shape).
pub fn record_upstream_error() {
    counter!("rankrelay_upstream_errors_total").increment(1);
}
