use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

pub(crate) fn record_report_render(output: &'static str, rows: usize) {
    metrics::counter!("report_renders_total", "output" => output).increment(1);
    metrics::histogram!("report_rows", "output" => output).record(rows as f64);
}

pub(crate) fn record_attempts_deleted(count: u64) {
    metrics::counter!("report_attempts_deleted_total").increment(count);
}
