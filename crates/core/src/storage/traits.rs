//! Trait definitions for the storage module.

use async_trait::async_trait;

use super::error::StorageError;
use super::types::{RawArtifact, StoredArtifact};

/// Durable storage for raw artifacts.
///
/// `store` must not return until the artifact is durable: the orchestrator
/// marks a job complete as soon as this returns `Ok`.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Returns the name of this store implementation.
    fn name(&self) -> &str;

    /// Persist `payload` under `identifier`, optionally compressed.
    ///
    /// Storing the same identifier twice replaces the earlier artifact.
    async fn store(
        &self,
        payload: &RawArtifact,
        identifier: &str,
        compress: bool,
    ) -> Result<StoredArtifact, StorageError>;
}
