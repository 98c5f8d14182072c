use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the process-wide recorder when `PROMETHEUS_ENABLED` is set. The
/// shell has no HTTP listener; `metrics` prints the current snapshot.
pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    tracing::debug!("Prometheus recorder installed");
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

pub(crate) fn record_submission(outcome: &'static str) {
    metrics::counter!("testit_quiz_submissions_total", "outcome" => outcome).increment(1);
}

pub(crate) fn record_backend_response(method: &str, status: u16) {
    metrics::counter!(
        "testit_backend_responses_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub(crate) fn record_transport_failure(method: &str) {
    metrics::counter!("testit_backend_transport_failures_total", "method" => method.to_string())
        .increment(1);
}
