use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const SUBMISSIONS_TOTAL: &str = "quiz_submissions_total";
pub const SCORE_DURATION_MS: &str = "quiz_score_duration_ms";
pub const REFERENCE_POINTS: &str = "quiz_reference_points";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the process-wide Prometheus recorder. Call once, from the binary.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

// Without an installed recorder these are no-ops.

pub fn record_submission(duration_ms: f64) {
    counter!(SUBMISSIONS_TOTAL).increment(1);
    histogram!(SCORE_DURATION_MS).record(duration_ms);
}

pub fn set_reference_points(n: usize) {
    gauge!(REFERENCE_POINTS).set(n as f64);
}
