//! Prometheus metrics

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder. Call once at startup.
pub fn init_metrics() -> Result<(), BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROMETHEUS.set(handle);
    Ok(())
}

/// Count a request by endpoint
pub fn record_request(endpoint: &'static str) {
    counter!("support_agent_requests_total", "endpoint" => endpoint).increment(1);
}

/// Record end-to-end chat latency
pub fn record_chat_latency(ms: f64) {
    histogram!("support_agent_chat_latency_ms").record(ms);
}

/// Count an error by kind
pub fn record_error(kind: &'static str) {
    counter!("support_agent_errors_total", "kind" => kind).increment(1);
}

/// Prometheus exposition endpoint
pub async fn metrics_handler() -> String {
    PROMETHEUS.get().map(|h| h.render()).unwrap_or_default()
}
