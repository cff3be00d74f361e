//! Prometheus metrics for recipe-service.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_counter, CounterVec,
    HistogramVec, IntCounter, TextEncoder,
};
use std::sync::OnceLock;

/// Recorder for the `metrics` facade used by the shared HTTP middleware.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "recipe_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

pub static RECIPES_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("recipes_created_total", "Total number of recipes created")
        .expect("Failed to register recipes_created")
});

pub static RECIPE_VIEWS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("recipe_views_total", "Total number of recipe detail views")
        .expect("Failed to register recipe_views")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "recipe_errors_total",
        "Total number of errors by type",
        &["error_type"] // db_error, validation_error, not_found, ...
    )
    .expect("Failed to register errors_total")
});

/// Initialize all metrics (forces lazy initialization).
///
/// Safe to call more than once; only the first call installs the recorder.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_none() {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                let _ = METRICS_HANDLE.set(handle);
            }
            Err(e) => tracing::debug!(error = %e, "Prometheus recorder already installed"),
        }
    }

    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&RECIPES_CREATED);
    Lazy::force(&RECIPE_VIEWS);
    Lazy::force(&ERRORS_TOTAL);
}

pub fn record_error(error_type: &str) {
    ERRORS_TOTAL.with_label_values(&[error_type]).inc();
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    output.push_str(&encoder.encode_to_string(&metric_families).unwrap_or_default());
    output
}
