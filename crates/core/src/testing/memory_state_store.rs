//! In-memory state store for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use serde_json::Value;

use crate::state::{StateError, StateStore};

/// StateStore kept in a map. Can be told to fail saves.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    documents: RwLock<HashMap<String, Value>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The saved document for `namespace`.
    pub fn document(&self, namespace: &str) -> Option<Value> {
        self.documents
            .read()
            .ok()
            .and_then(|docs| docs.get(namespace).cloned())
    }

    /// Completed job ids saved for `namespace`.
    pub fn completed(&self, namespace: &str) -> Vec<String> {
        self.document(namespace)
            .and_then(|doc| serde_json::from_value(doc["completed"].clone()).ok())
            .unwrap_or_default()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, namespace: &str) -> Result<Option<Value>, StateError> {
        let docs = self
            .documents
            .read()
            .map_err(|_| StateError::Database("lock poisoned".to_string()))?;
        Ok(docs.get(namespace).cloned())
    }

    fn save(&self, namespace: &str, document: &Value) -> Result<(), StateError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StateError::Io {
                path: namespace.to_string(),
                source: std::io::Error::other("mock save failure"),
            });
        }
        self.documents
            .write()
            .map_err(|_| StateError::Database("lock poisoned".to_string()))?
            .insert(namespace.to_string(), document.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
