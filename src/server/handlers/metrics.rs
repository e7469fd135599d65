use crate::metrics;

/// Prometheus exposition endpoint.
pub async fn metrics_text() -> String {
    metrics::prometheus_handle().render()
}
