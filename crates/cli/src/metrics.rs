//! Prometheus metrics export.
//!
//! A run is a batch job, so there is no scrape endpoint: metrics are written
//! in text exposition format to a file (for node_exporter's textfile
//! collector) when the run ends.

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntGauge, Registry, TextEncoder};

use cropstat_core::storage::write_atomic;
use cropstat_core::RunSummary;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Unix time the last run finished.
pub static LAST_RUN_TIMESTAMP: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "cropstat_last_run_timestamp_seconds",
        "Unix time the last ingest run finished",
    )
    .unwrap()
});

/// Whether the last run finished without error.
pub static LAST_RUN_SUCCESS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "cropstat_last_run_success",
        "1 if the last ingest run completed, 0 if it aborted",
    )
    .unwrap()
});

/// Jobs complete out of the full plan after the last successful run.
pub static JOBS_COMPLETE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "cropstat_jobs_complete",
        "Planned jobs complete after the last successful ingest run",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(LAST_RUN_TIMESTAMP.clone()))
        .unwrap();
    registry
        .register(Box::new(LAST_RUN_SUCCESS.clone()))
        .unwrap();
    registry.register(Box::new(JOBS_COMPLETE.clone())).unwrap();

    for metric in cropstat_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Record the outcome of a run in the run-level gauges.
pub fn record_run(summary: Option<&RunSummary>) {
    LAST_RUN_TIMESTAMP.set(unix_now());
    match summary {
        Some(summary) => {
            LAST_RUN_SUCCESS.set(1);
            JOBS_COMPLETE.set((summary.already_complete + summary.completed) as i64);
        }
        None => LAST_RUN_SUCCESS.set(0),
    }
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Encode all metrics in Prometheus text format.
pub fn encode_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics output is not UTF-8")
}

/// Write all metrics to `path`, replacing it atomically.
pub fn write_textfile(path: &Path) -> Result<()> {
    let text = encode_metrics()?;
    write_atomic(path, text.as_bytes())
        .with_context(|| format!("Failed to write metrics to {:?}", path))
}
