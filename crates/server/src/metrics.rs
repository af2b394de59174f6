//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the songbook server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Catalog size (collected dynamically)
//! - Core enrichment, metadata and liveness metrics

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use songbook_core::Predicate;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "songbook_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("songbook_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "songbook_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Songs in the catalog (collected dynamically).
pub static SONGS_TOTAL: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("songbook_songs", "Number of songs in the catalog").unwrap()
});

/// Songs created since startup.
pub static SONGS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "songbook_songs_created_total",
        "Total songs created since startup",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Catalog
    registry.register(Box::new(SONGS_TOTAL.clone())).unwrap();
    registry
        .register(Box::new(SONGS_CREATED_TOTAL.clone()))
        .unwrap();

    // Core metrics (enrichment, metadata service, liveness)
    for metric in songbook_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Collect dynamic metrics from current application state.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    match state.songs().store().count(&Predicate::all()) {
        Ok(count) => SONGS_TOTAL.set(i64::try_from(count).unwrap_or(i64::MAX)),
        Err(e) => tracing::warn!("Failed to count songs for metrics: {}", e),
    }
}

static NUMERIC_SEGMENT: Lazy<regex_lite::Regex> =
    Lazy::new(|| regex_lite::Regex::new(r"/\d+(/|$)").unwrap());

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    // Run twice: adjacent numeric segments share a slash, so one pass skips every other one.
    let result = NUMERIC_SEGMENT.replace_all(path, "/{id}$1");
    let result = NUMERIC_SEGMENT.replace_all(&result, "/{id}$1");
    result.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric() {
        let path = "/api/v1/songs/12345";
        assert_eq!(normalize_path(path), "/api/v1/songs/{id}");
    }

    #[test]
    fn test_normalize_path_numeric_middle() {
        let path = "/api/v1/songs/12345/verses";
        assert_eq!(normalize_path(path), "/api/v1/songs/{id}/verses");
    }

    #[test]
    fn test_normalize_path_adjacent_numbers() {
        assert_eq!(normalize_path("/a/1/2/3"), "/a/{id}/{id}/{id}");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        let path = "/api/v1/health";
        assert_eq!(normalize_path(path), "/api/v1/health");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics().unwrap();
        assert!(output.contains("songbook_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        // Prometheus only outputs labelled metrics that have been touched
        songbook_core::metrics::ENRICHMENT_OUTCOMES
            .with_label_values(&["enriched"])
            .inc_by(0);
        SONGS_TOTAL.set(0);

        let output = encode_metrics().unwrap();

        assert!(output.contains("songbook_songs"));
        assert!(output.contains("songbook_enrichment_total"));
        assert!(output.contains("songbook_enrichment_dropped_total"));
        assert!(output.contains("songbook_liveness_consecutive_failures"));
    }
}
