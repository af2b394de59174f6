//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Enrichment (job outcomes, queue drops)
//! - Metadata service calls
//! - Store liveness

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Enrichment
// =============================================================================

/// Enrichment jobs resolved, by outcome.
pub static ENRICHMENT_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("songbook_enrichment_total", "Total enrichment jobs by outcome"),
        &["outcome"], // "enriched", "no_details", "lookup_failed", "invalid_details", "store_failed"
    )
    .unwrap()
});

/// Enrichment jobs dropped because the queue was full or closed.
pub static ENRICHMENT_DROPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "songbook_enrichment_dropped_total",
        "Enrichment jobs dropped before reaching the worker",
    )
    .unwrap()
});

// =============================================================================
// Metadata service
// =============================================================================

/// Metadata lookups by status.
pub static METADATA_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "songbook_metadata_requests_total",
            "Total metadata service requests",
        ),
        &["status"], // "success", "error"
    )
    .unwrap()
});

/// Metadata lookup duration in seconds.
pub static METADATA_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "songbook_metadata_duration_seconds",
            "Duration of metadata service calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["status"],
    )
    .unwrap()
});

// =============================================================================
// Liveness
// =============================================================================

/// Current run of consecutive failed store pings.
pub static LIVENESS_CONSECUTIVE_FAILURES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "songbook_liveness_consecutive_failures",
        "Consecutive failed store liveness pings",
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Enrichment
        Box::new(ENRICHMENT_OUTCOMES.clone()),
        Box::new(ENRICHMENT_DROPPED.clone()),
        // Metadata
        Box::new(METADATA_REQUESTS.clone()),
        Box::new(METADATA_DURATION.clone()),
        // Liveness
        Box::new(LIVENESS_CONSECUTIVE_FAILURES.clone()),
    ]
}
