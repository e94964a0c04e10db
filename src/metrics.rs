// src/metrics.rs
//! Prometheus wiring: recorder installation, the `/metrics` router, and
//! one-time registration of the series this service emits.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("profiles_scored_total", "Profiles analyzed successfully.");
        describe_counter!(
            "profile_fetch_errors_total",
            "Profile page fetch failures."
        );
        describe_counter!("badges_kept_total", "Badges that survived filtering.");
        describe_counter!(
            "badges_dropped_malformed_total",
            "Cards dropped for a missing title or date element."
        );
        describe_counter!(
            "badges_dropped_undated_total",
            "Cards dropped with no recognizable date substring."
        );
        describe_counter!(
            "badges_dropped_stale_total",
            "Badges dropped as earned before the program cutoff."
        );
        describe_counter!(
            "badges_dropped_unclassified_total",
            "Badges dropped by the classification pipeline."
        );
        describe_counter!("access_denied_total", "Requests rejected by the access gate.");
        describe_histogram!("analyze_ms", "Document analysis time in milliseconds.");
        describe_gauge!("board_entries", "Distinct profiles on the score board.");
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and register our series.
    pub fn init() -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");
        ensure_metrics_described();
        Self { handle }
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
