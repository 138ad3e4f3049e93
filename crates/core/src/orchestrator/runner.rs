//! Ingest orchestrator implementation.
//!
//! Processes pending jobs strictly one at a time:
//! fetch -> store (if non-empty) -> mark complete -> pace.
//! The first failure ends the run; the failing job stays pending.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::catalog::Catalog;
use crate::client::FetchClient;
use crate::metrics;
use crate::planner::{plan, Job};
use crate::state::{filter_pending, StateTracker};
use crate::storage::{ArtifactStore, RawArtifact};

use super::config::OrchestratorConfig;
use super::pacing::Pacer;
use super::types::{IngestError, JobOutcome, JobReport, PlannedJob, RunSummary};

/// Called after every completed job.
pub type ProgressCallback = Arc<dyn Fn(&JobReport) + Send + Sync>;

/// Drives pending jobs through fetch, storage and completion tracking.
pub struct IngestOrchestrator {
    config: OrchestratorConfig,
    client: Arc<dyn FetchClient>,
    store: Arc<dyn ArtifactStore>,
    tracker: StateTracker,
    pacer: Arc<dyn Pacer>,
    on_progress: Option<ProgressCallback>,
}

impl IngestOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        config: OrchestratorConfig,
        client: Arc<dyn FetchClient>,
        store: Arc<dyn ArtifactStore>,
        tracker: StateTracker,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            config,
            client,
            store,
            tracker,
            pacer,
            on_progress: None,
        }
    }

    /// Register a callback invoked after each completed job.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// The full plan with completion marks. Reads state, writes nothing.
    pub fn preview(&self, catalog: &Catalog) -> Result<Vec<PlannedJob>, IngestError> {
        let state = self.tracker.load()?;

        Ok(plan(catalog)
            .into_iter()
            .map(|job| {
                let job_id = job.job_id();
                PlannedJob {
                    completed: state.is_complete(&job_id),
                    job_id,
                    window: job.window(),
                    display_name: job.display_name,
                }
            })
            .collect())
    }

    /// Run every pending job in catalog order.
    ///
    /// Returns the run summary, or the error that stopped the run. Jobs
    /// completed before the error stay completed.
    pub async fn run(&self, catalog: &Catalog) -> Result<RunSummary, IngestError> {
        let jobs = plan(catalog);
        let mut state = self.tracker.load()?;
        let pending = filter_pending(&jobs, &state);

        let mut summary = RunSummary::start(self.tracker.source_name(), jobs.len(), pending.len());

        if pending.is_empty() {
            info!("All datasets up to date ({} jobs complete)", jobs.len());
            return Ok(summary);
        }

        info!(
            "Ingesting {} of {} jobs for {} ({} already complete)",
            pending.len(),
            jobs.len(),
            self.tracker.source_name(),
            summary.already_complete
        );

        let total = pending.len();
        for (i, job) in pending.iter().enumerate() {
            let index = i + 1;
            let job_id = job.job_id();
            let started = Instant::now();

            info!(
                "[{}/{}] Fetching {} ({})...",
                index,
                total,
                job.display_name,
                job.window()
            );

            let fetch_started = Instant::now();
            let records = match self
                .client
                .fetch(&job.query_params, job.year_start, job.year_end)
                .await
            {
                Ok(records) => records,
                Err(e) => {
                    metrics::JOBS_TOTAL.with_label_values(&["failed"]).inc();
                    error!("[{}/{}] Fetch failed for {}: {}", index, total, job_id, e);
                    return Err(IngestError::Aborted { job_id, source: e });
                }
            };
            metrics::FETCH_DURATION.observe(fetch_started.elapsed().as_secs_f64());
            metrics::RECORDS_FETCHED.inc_by(records.len() as u64);

            let count = records.len();
            if count >= self.config.record_ceiling {
                metrics::CEILING_HITS.inc();
                warn!(
                    "{} returned {} records (ceiling {}); the window may be truncated",
                    job_id, count, self.config.record_ceiling
                );
            }

            let outcome = self.store_records(job, &job_id, records).await?;

            if let Err(e) = self.tracker.mark_complete(&mut state, &job_id) {
                metrics::JOBS_TOTAL.with_label_values(&["failed"]).inc();
                error!("Failed to persist completion of {}: {}", job_id, e);
                return Err(IngestError::Persist { job_id, source: e });
            }

            match &outcome {
                JobOutcome::Stored { artifact } => {
                    info!("[{}/{}] Saved {} records", index, total, count);
                    debug!(
                        "Artifact {} ({} bytes, sha256 {})",
                        artifact.identifier, artifact.bytes, artifact.sha256
                    );
                }
                JobOutcome::Empty => info!("[{}/{}] No data available", index, total),
            }

            let elapsed = started.elapsed();
            metrics::JOBS_TOTAL.with_label_values(&[outcome.label()]).inc();
            metrics::JOB_DURATION.observe(elapsed.as_secs_f64());

            let report = JobReport {
                index,
                total,
                job_id,
                display_name: job.display_name.clone(),
                window: job.window(),
                records: count,
                outcome,
                duration_ms: elapsed.as_millis() as u64,
            };
            summary.record(&report);
            if let Some(callback) = &self.on_progress {
                callback(&report);
            }

            if index < total {
                self.pacer.pause().await;
            }
        }

        summary.finished_at = Utc::now();
        info!("Ingested {} dataset chunks", summary.completed);
        Ok(summary)
    }

    async fn store_records(
        &self,
        job: &Job,
        job_id: &str,
        records: Vec<serde_json::Value>,
    ) -> Result<JobOutcome, IngestError> {
        if records.is_empty() {
            return Ok(JobOutcome::Empty);
        }

        let identifier = self.config.artifact_identifier(job_id);
        let payload = RawArtifact::from_job(job, records);

        match self
            .store
            .store(&payload, &identifier, self.config.compress)
            .await
        {
            Ok(artifact) => {
                metrics::ARTIFACT_BYTES.inc_by(artifact.bytes);
                Ok(JobOutcome::Stored { artifact })
            }
            Err(e) => {
                metrics::JOBS_TOTAL.with_label_values(&["failed"]).inc();
                error!("Failed to store {} in {}: {}", identifier, self.store.name(), e);
                Err(IngestError::Storage {
                    job_id: job_id.to_string(),
                    source: e,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use serde_json::json;

    use crate::catalog::DatasetSpec;
    use crate::client::FetchError;
    use crate::orchestrator::NoDelay;
    use crate::state::StateStore;
    use crate::testing::{fixtures, MemoryStateStore, MockArtifactStore, MockFetchClient};

    struct Harness {
        client: Arc<MockFetchClient>,
        store: Arc<MockArtifactStore>,
        state: Arc<MemoryStateStore>,
        orchestrator: IngestOrchestrator,
    }

    fn harness() -> Harness {
        let client = Arc::new(MockFetchClient::new());
        let store = Arc::new(MockArtifactStore::new());
        let state = Arc::new(MemoryStateStore::new());
        let orchestrator = IngestOrchestrator::new(
            OrchestratorConfig::default(),
            client.clone(),
            store.clone(),
            StateTracker::new(state.clone(), "nass_quickstats"),
            Arc::new(NoDelay),
        );
        Harness {
            client,
            store,
            state,
            orchestrator,
        }
    }

    fn two_dataset_catalog() -> Catalog {
        Catalog::new(vec![
            DatasetSpec::new("corn_production", "Corn Production", "")
                .with_param("commodity_desc", "CORN")
                .with_window(1950, 1989)
                .with_window(1990, 2025),
            DatasetSpec::new("oats_production", "Oats Production", "")
                .with_param("commodity_desc", "OATS")
                .with_window(1950, 2025),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_stores_and_marks_each_job() {
        let h = harness();
        h.client.set_default_records(fixtures::records(2)).await;

        let summary = h.orchestrator.run(&two_dataset_catalog()).await.unwrap();

        assert_eq!(summary.planned, 3);
        assert_eq!(summary.completed, 3);
        assert_eq!(summary.artifacts, 3);
        assert_eq!(summary.records, 6);
        assert_eq!(
            h.store.identifiers().await,
            vec![
                "nass_corn_production_1950_1989",
                "nass_corn_production_1990_2025",
                "nass_oats_production_1950_2025",
            ]
        );
        assert_eq!(
            h.state.document("nass_quickstats"),
            Some(json!({"completed": [
                "corn_production_1950_1989",
                "corn_production_1990_2025",
                "oats_production_1950_2025",
            ]}))
        );
    }

    #[tokio::test]
    async fn test_second_run_fetches_nothing() {
        let h = harness();
        let catalog = two_dataset_catalog();
        h.orchestrator.run(&catalog).await.unwrap();
        let calls = h.client.call_count().await;

        let summary = h.orchestrator.run(&catalog).await.unwrap();

        assert!(summary.nothing_to_do());
        assert_eq!(h.client.call_count().await, calls);
    }

    #[tokio::test]
    async fn test_nothing_pending_writes_no_state() {
        let h = harness();
        let catalog = two_dataset_catalog();
        h.orchestrator.run(&catalog).await.unwrap();
        let saves = h.state.save_count();

        h.orchestrator.run(&catalog).await.unwrap();

        assert_eq!(h.state.save_count(), saves);
    }

    #[tokio::test]
    async fn test_empty_result_marks_without_storing() {
        let h = harness();
        h.client.set_default_records(Vec::new()).await;

        let summary = h.orchestrator.run(&two_dataset_catalog()).await.unwrap();

        assert_eq!(summary.completed, 3);
        assert_eq!(summary.empty, 3);
        assert!(h.store.identifiers().await.is_empty());
        assert_eq!(h.state.completed("nass_quickstats").len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_error_aborts_and_leaves_job_pending() {
        let h = harness();
        let catalog = two_dataset_catalog();
        h.client
            .set_error_for(
                &fixtures::job(&catalog, "corn_production_1990_2025"),
                FetchError::ApiError("invalid commodity".to_string()),
            )
            .await;

        let err = h.orchestrator.run(&catalog).await.unwrap_err();

        assert!(matches!(
            err,
            IngestError::Aborted { ref job_id, source: FetchError::ApiError(_) }
                if job_id == "corn_production_1990_2025"
        ));
        assert_eq!(
            h.state.completed("nass_quickstats"),
            vec!["corn_production_1950_1989"]
        );
        // The run stops; the third job is never attempted.
        assert_eq!(h.client.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_next_error_aborts_on_first_job() {
        let h = harness();
        h.client
            .set_next_error(FetchError::StatusError {
                status: 503,
                message: "upstream down".to_string(),
            })
            .await;

        let err = h.orchestrator.run(&two_dataset_catalog()).await.unwrap_err();

        assert_eq!(err.job_id(), Some("corn_production_1950_1989"));
        let calls = h.client.recorded_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].query_params["commodity_desc"], "CORN");
        assert_eq!((calls[0].year_start, calls[0].year_end), (1950, 1989));
        assert!(h.store.identifiers().await.is_empty());
        assert_eq!(h.state.document("nass_quickstats"), None);
    }

    #[tokio::test]
    async fn test_record_ceiling_still_stores_and_marks() {
        let client = Arc::new(MockFetchClient::new());
        let store = Arc::new(MockArtifactStore::new());
        let state = Arc::new(MemoryStateStore::new());
        let orchestrator = IngestOrchestrator::new(
            OrchestratorConfig {
                record_ceiling: 2,
                ..Default::default()
            },
            client.clone(),
            store.clone(),
            StateTracker::new(state.clone(), "nass_quickstats"),
            Arc::new(NoDelay),
        );
        client.set_default_records(fixtures::records(2)).await;
        let catalog = Catalog::new(vec![fixtures::dataset_spec("corn_production", 1990, 2024)]).unwrap();
        let hits_before = metrics::CEILING_HITS.get();

        let summary = orchestrator.run(&catalog).await.unwrap();

        assert!(metrics::CEILING_HITS.get() > hits_before);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.records, 2);
        assert_eq!(client.call_count().await, 1);
        let artifact = store
            .get("nass_corn_production_1990_2024")
            .await
            .expect("artifact stored");
        assert_eq!(artifact.data.len(), 2);
        assert_eq!(
            state.completed("nass_quickstats"),
            vec!["corn_production_1990_2024"]
        );
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_job_unmarked() {
        let h = harness();
        h.store.fail_stores(true).await;

        let err = h.orchestrator.run(&two_dataset_catalog()).await.unwrap_err();

        assert!(matches!(err, IngestError::Storage { .. }));
        assert!(h.state.completed("nass_quickstats").is_empty());
    }

    #[tokio::test]
    async fn test_state_failure_aborts_after_store() {
        let h = harness();
        h.state.fail_saves(true);

        let err = h.orchestrator.run(&two_dataset_catalog()).await.unwrap_err();

        assert!(matches!(err, IngestError::Persist { .. }));
        assert_eq!(h.store.identifiers().await.len(), 1);
        assert_eq!(h.state.document("nass_quickstats"), None);
    }

    #[tokio::test]
    async fn test_progress_callback_sees_every_job() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let h = harness();
        let orchestrator = h.orchestrator.with_progress(Arc::new(move |report: &JobReport| {
            sink.lock()
                .unwrap()
                .push(format!("{}/{} {}", report.index, report.total, report.job_id));
        }));

        orchestrator.run(&two_dataset_catalog()).await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "1/3 corn_production_1950_1989",
                "2/3 corn_production_1990_2025",
                "3/3 oats_production_1950_2025",
            ]
        );
    }

    #[tokio::test]
    async fn test_pacer_skipped_after_last_job() {
        let pacer = Arc::new(crate::testing::CountingPacer::default());
        let orchestrator = IngestOrchestrator::new(
            OrchestratorConfig::default(),
            Arc::new(MockFetchClient::new()),
            Arc::new(MockArtifactStore::new()),
            StateTracker::new(Arc::new(MemoryStateStore::new()), "nass_quickstats"),
            pacer.clone(),
        );

        orchestrator.run(&two_dataset_catalog()).await.unwrap();

        assert_eq!(pacer.count(), 2);
    }

    #[tokio::test]
    async fn test_empty_prefix_uses_job_id() {
        let store = Arc::new(MockArtifactStore::new());
        let orchestrator = IngestOrchestrator::new(
            OrchestratorConfig {
                artifact_prefix: String::new(),
                ..Default::default()
            },
            Arc::new(MockFetchClient::new()),
            store.clone(),
            StateTracker::new(Arc::new(MemoryStateStore::new()), "nass_quickstats"),
            Arc::new(NoDelay),
        );
        let catalog = Catalog::new(vec![fixtures::dataset_spec("corn_production", 1990, 2024)]).unwrap();

        orchestrator.run(&catalog).await.unwrap();

        assert_eq!(store.identifiers().await, vec!["corn_production_1990_2024"]);
    }

    #[tokio::test]
    async fn test_preview_marks_completed_jobs() {
        let h = harness();
        h.state
            .save("nass_quickstats", &json!({"completed": ["corn_production_1950_1989"]}))
            .unwrap();
        let saves = h.state.save_count();

        let planned = h.orchestrator.preview(&two_dataset_catalog()).unwrap();

        let marks: Vec<_> = planned.iter().map(|p| (p.job_id.as_str(), p.completed)).collect();
        assert_eq!(
            marks,
            vec![
                ("corn_production_1950_1989", true),
                ("corn_production_1990_2025", false),
                ("oats_production_1950_2025", false),
            ]
        );
        assert_eq!(h.client.call_count().await, 0);
        assert_eq!(h.state.save_count(), saves);
    }
}
