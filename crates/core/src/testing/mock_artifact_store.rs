//! Mock artifact store for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::storage::{ArtifactStore, RawArtifact, StorageError, StoredArtifact};

/// Mock implementation of the ArtifactStore trait.
///
/// Keeps every stored payload in memory, in store order.
#[derive(Debug)]
pub struct MockArtifactStore {
    stored: Arc<RwLock<Vec<(String, RawArtifact)>>>,
    fail: Arc<RwLock<bool>>,
}

impl Default for MockArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockArtifactStore {
    /// Create a new mock artifact store.
    pub fn new() -> Self {
        Self {
            stored: Arc::new(RwLock::new(Vec::new())),
            fail: Arc::new(RwLock::new(false)),
        }
    }

    /// Make every subsequent store fail.
    pub async fn fail_stores(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Identifiers stored so far, in order.
    pub async fn identifiers(&self) -> Vec<String> {
        self.stored
            .read()
            .await
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// The payload stored most recently under `identifier`.
    pub async fn get(&self, identifier: &str) -> Option<RawArtifact> {
        self.stored
            .read()
            .await
            .iter()
            .rev()
            .find(|(id, _)| id == identifier)
            .map(|(_, payload)| payload.clone())
    }
}

#[async_trait]
impl ArtifactStore for MockArtifactStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn store(
        &self,
        payload: &RawArtifact,
        identifier: &str,
        compress: bool,
    ) -> Result<StoredArtifact, StorageError> {
        if *self.fail.read().await {
            return Err(StorageError::Io {
                path: identifier.into(),
                source: std::io::Error::other("mock storage failure"),
            });
        }

        let bytes = serde_json::to_vec(payload)?;
        self.stored
            .write()
            .await
            .push((identifier.to_string(), payload.clone()));

        Ok(StoredArtifact {
            identifier: identifier.to_string(),
            path: None,
            bytes: bytes.len() as u64,
            sha256: "mock-sha256".to_string(),
            records: payload.data.len(),
            compressed: compress,
        })
    }
}
