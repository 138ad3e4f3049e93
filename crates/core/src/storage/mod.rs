//! Raw artifact storage.
//!
//! Every non-empty job produces one immutable artifact containing the
//! records exactly as returned by the remote API. [`FsArtifactStore`] writes
//! them atomically (temp file + rename), optionally zstd-compressed, so a
//! crash mid-write never leaves a truncated artifact behind.

mod atomic;
mod error;
mod fs_store;
mod traits;
mod types;

pub use atomic::write_atomic;
pub use error::StorageError;
pub use fs_store::FsArtifactStore;
pub use traits::ArtifactStore;
pub use types::{RawArtifact, StoredArtifact};
