//! Prometheus metrics for provider calls.
//!
//! This module provides metrics for:
//! - Provider request counts by outcome
//! - Provider request latency
//! - Results returned per query

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};
use std::time::Duration;

// =============================================================================
// Provider Metrics
// =============================================================================

/// Provider request duration.
pub static PROVIDER_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "mediasearch_provider_request_duration_seconds",
            "Duration of provider search calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0]),
        &["provider", "operation"],
    )
    .unwrap()
});

/// Provider requests total.
pub static PROVIDER_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "mediasearch_provider_requests_total",
            "Total provider search requests",
        ),
        &["provider", "operation", "status"], // status: "success" or an error kind
    )
    .unwrap()
});

/// Normalized results returned per query.
pub static SEARCH_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "mediasearch_search_results",
            "Number of normalized results returned per provider query",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
        &["provider"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Record a provider call that produced a (possibly empty) result set.
pub fn record_success(provider: &str, operation: &str, elapsed: Duration, results: usize) {
    PROVIDER_REQUEST_DURATION
        .with_label_values(&[provider, operation])
        .observe(elapsed.as_secs_f64());
    PROVIDER_REQUESTS
        .with_label_values(&[provider, operation, "success"])
        .inc();
    SEARCH_RESULTS
        .with_label_values(&[provider])
        .observe(results as f64);
}

/// Record a provider call that failed and degraded to no results.
pub fn record_failure(provider: &str, operation: &str, elapsed: Duration, kind: &str) {
    PROVIDER_REQUEST_DURATION
        .with_label_values(&[provider, operation])
        .observe(elapsed.as_secs_f64());
    PROVIDER_REQUESTS
        .with_label_values(&[provider, operation, kind])
        .inc();
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(PROVIDER_REQUEST_DURATION.clone()),
        Box::new(PROVIDER_REQUESTS.clone()),
        Box::new(SEARCH_RESULTS.clone()),
    ]
}
