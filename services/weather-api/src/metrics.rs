//! Prometheus metrics for requests, upstream calls and the access guard.

use std::time::Duration;

use anyhow::{Context, Result};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::envelope::SourceKind;

/// Install the global Prometheus recorder. Call once, from `main`.
pub fn install_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

/// Record a finished weather request.
pub fn record_request(result: &'static str, elapsed: Duration) {
    counter!("weather_requests_total", "result" => result).increment(1);
    histogram!("weather_request_duration_ms").record(elapsed.as_secs_f64() * 1000.0);
}

/// Record one upstream call (or one fan-out branch).
pub fn record_upstream(source: SourceKind, outcome: &'static str, elapsed: Duration) {
    counter!("upstream_requests_total", "source" => source.as_str(), "outcome" => outcome).increment(1);
    histogram!("upstream_duration_ms", "source" => source.as_str()).record(elapsed.as_secs_f64() * 1000.0);
}

/// Record how many stations the particulate-matter cascade tried.
pub fn record_station_attempts(attempts: usize) {
    histogram!("pm_station_attempts").record(attempts as f64);
}

/// Record a request turned away by the access guard.
pub fn record_access_denied(reason: &'static str) {
    counter!("access_denied_total", "reason" => reason).increment(1);
}
