//! JSON-file state store: one `<namespace>.json` per source.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{validate_namespace, StateError, StateStore};
use crate::storage::write_atomic;

/// Stores each namespace as a pretty-printed JSON file under `dir`.
pub struct JsonStateStore {
    dir: PathBuf,
}

impl JsonStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{}.json", namespace))
    }
}

impl StateStore for JsonStateStore {
    fn load(&self, namespace: &str) -> Result<Option<Value>, StateError> {
        validate_namespace(namespace)?;
        let path = self.path_for(namespace);

        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StateError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| StateError::Corrupt {
                namespace: namespace.to_string(),
                message: e.to_string(),
            })
    }

    fn save(&self, namespace: &str, document: &Value) -> Result<(), StateError> {
        validate_namespace(namespace)?;
        let path = self.path_for(namespace);

        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| StateError::Serialization(e.to_string()))?;

        write_atomic(&path, &bytes).map_err(|e| StateError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_namespace_is_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateStore::new(dir.path());
        assert!(store.load("nass_quickstats").unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateStore::new(dir.path().join("state"));
        let doc = json!({"completed": ["corn_yield_1950_2025"]});

        store.save("nass_quickstats", &doc).unwrap();

        assert!(dir.path().join("state/nass_quickstats.json").exists());
        assert_eq!(store.load("nass_quickstats").unwrap(), Some(doc));
    }

    #[test]
    fn test_namespaces_are_independent() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateStore::new(dir.path());

        store.save("a", &json!({"completed": ["x"]})).unwrap();

        assert!(store.load("b").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let store = JsonStateStore::new(dir.path());

        assert!(matches!(
            store.load("broken"),
            Err(StateError::Corrupt { .. })
        ));
    }
}
