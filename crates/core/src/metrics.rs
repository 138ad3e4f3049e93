//! Prometheus metrics for the ingestion pipeline.
//!
//! This module provides metrics for:
//! - Jobs (outcomes, duration)
//! - Fetches (records returned, latency, ceiling hits)
//! - Storage (artifact bytes written)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Job Metrics
// =============================================================================

/// Jobs processed by outcome.
pub static JOBS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cropstat_jobs_total", "Total ingestion jobs processed"),
        &["outcome"], // "stored", "empty", "failed"
    )
    .unwrap()
});

/// Wall-clock duration of a job (fetch + store + state write).
pub static JOB_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("cropstat_job_duration_seconds", "Duration of one ingestion job")
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
    )
    .unwrap()
});

// =============================================================================
// Fetch Metrics
// =============================================================================

/// Records returned by the remote API.
pub static RECORDS_FETCHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cropstat_records_fetched_total",
        "Total records returned by the remote API",
    )
    .unwrap()
});

/// Remote API request latency.
pub static FETCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("cropstat_fetch_duration_seconds", "Remote API request latency")
            .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
    )
    .unwrap()
});

/// Responses whose size reached the per-request record ceiling.
pub static CEILING_HITS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cropstat_record_ceiling_hits_total",
        "Responses that reached the per-request record ceiling",
    )
    .unwrap()
});

// =============================================================================
// Storage Metrics
// =============================================================================

/// Bytes written to artifact storage.
pub static ARTIFACT_BYTES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cropstat_artifact_bytes_total",
        "Total bytes written to artifact storage",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(JOBS_TOTAL.clone()),
        Box::new(JOB_DURATION.clone()),
        Box::new(RECORDS_FETCHED.clone()),
        Box::new(FETCH_DURATION.clone()),
        Box::new(CEILING_HITS.clone()),
        Box::new(ARTIFACT_BYTES.clone()),
    ]
}
