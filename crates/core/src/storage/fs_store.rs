//! File system artifact store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::atomic::write_atomic;
use super::error::StorageError;
use super::traits::ArtifactStore;
use super::types::{RawArtifact, StoredArtifact};

const JSON_EXT: &str = "json";
const ZSTD_EXT: &str = "json.zst";
const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Stores each artifact as `<root>/<identifier>.json`, or `.json.zst` when
/// compressed.
pub struct FsArtifactStore {
    root: PathBuf,
    compression_level: i32,
}

impl FsArtifactStore {
    /// Creates a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Overrides the zstd compression level.
    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an artifact is (or would be) stored at.
    pub fn path_for(&self, identifier: &str, compressed: bool) -> PathBuf {
        let ext = if compressed { ZSTD_EXT } else { JSON_EXT };
        self.root.join(format!("{}.{}", identifier, ext))
    }

    /// Reads an artifact back, whichever format it was stored in.
    pub fn load(&self, identifier: &str) -> Result<RawArtifact, StorageError> {
        validate_identifier(identifier)?;

        let compressed = self.path_for(identifier, true);
        if compressed.exists() {
            let bytes = std::fs::read(&compressed).map_err(|e| StorageError::io(&compressed, e))?;
            let json = zstd::decode_all(&bytes[..]).map_err(|e| StorageError::Compression {
                path: compressed.clone(),
                source: e,
            })?;
            return Ok(serde_json::from_slice(&json)?);
        }

        let plain = self.path_for(identifier, false);
        if plain.exists() {
            let bytes = std::fs::read(&plain).map_err(|e| StorageError::io(&plain, e))?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        Err(StorageError::NotFound(identifier.to_string()))
    }
}

fn validate_identifier(identifier: &str) -> Result<(), StorageError> {
    let valid = !identifier.is_empty()
        && !identifier.starts_with('.')
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidIdentifier(identifier.to_string()))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn store(
        &self,
        payload: &RawArtifact,
        identifier: &str,
        compress: bool,
    ) -> Result<StoredArtifact, StorageError> {
        validate_identifier(identifier)?;

        let path = self.path_for(identifier, compress);
        let stale = self.path_for(identifier, !compress);
        let json = serde_json::to_vec(payload)?;
        let level = self.compression_level;

        let target = path.clone();
        let (bytes, sha256) = tokio::task::spawn_blocking(move || {
            let encoded = if compress {
                zstd::encode_all(&json[..], level).map_err(|e| StorageError::Compression {
                    path: target.clone(),
                    source: e,
                })?
            } else {
                json
            };
            let digest = format!("{:x}", Sha256::digest(&encoded));
            write_atomic(&target, &encoded).map_err(|e| StorageError::io(&target, e))?;

            // A re-run with the other compression setting must not leave two copies.
            match std::fs::remove_file(&stale) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::io(&stale, e)),
            }

            Ok::<_, StorageError>((encoded.len() as u64, digest))
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))??;

        debug!(
            "Stored artifact {} at {:?} ({} bytes, sha256 {})",
            identifier, path, bytes, sha256
        );

        Ok(StoredArtifact {
            identifier: identifier.to_string(),
            path: Some(path),
            bytes,
            sha256,
            records: payload.data.len(),
            compressed: compress,
        })
    }
}
