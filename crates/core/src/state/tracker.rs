//! Completion tracking on top of a [`StateStore`].

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{StateError, StateStore};
use crate::planner::Job;

/// The set of job ids already ingested for one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionState {
    #[serde(default)]
    pub completed: BTreeSet<String>,
}

impl CompletionState {
    pub fn is_complete(&self, job_id: &str) -> bool {
        self.completed.contains(job_id)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

/// Jobs whose id is not yet in `state`, in their original order.
pub fn filter_pending(jobs: &[Job], state: &CompletionState) -> Vec<Job> {
    jobs.iter()
        .filter(|job| !state.is_complete(&job.job_id()))
        .cloned()
        .collect()
}

/// Loads and persists the [`CompletionState`] of one ingestion source.
#[derive(Clone)]
pub struct StateTracker {
    store: Arc<dyn StateStore>,
    source_name: String,
}

impl StateTracker {
    pub fn new(store: Arc<dyn StateStore>, source_name: impl Into<String>) -> Self {
        Self {
            store,
            source_name: source_name.into(),
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Load the completion state. A source with no saved state starts empty.
    pub fn load(&self) -> Result<CompletionState, StateError> {
        match self.store.load(&self.source_name)? {
            Some(document) => {
                serde_json::from_value(document).map_err(|e| StateError::Corrupt {
                    namespace: self.source_name.clone(),
                    message: e.to_string(),
                })
            }
            None => {
                debug!("No saved state for {}, starting fresh", self.source_name);
                Ok(CompletionState::default())
            }
        }
    }

    /// Record `job_id` as complete and persist the full set before returning.
    ///
    /// If persisting fails the id is removed again, so `state` never claims
    /// more than the store holds.
    pub fn mark_complete(
        &self,
        state: &mut CompletionState,
        job_id: &str,
    ) -> Result<(), StateError> {
        let newly_added = state.completed.insert(job_id.to_string());

        let result = serde_json::to_value(&*state)
            .map_err(|e| StateError::Serialization(e.to_string()))
            .and_then(|document| self.store.save(&self.source_name, &document));

        if result.is_err() && newly_added {
            state.completed.remove(job_id);
        }
        result
    }
}
