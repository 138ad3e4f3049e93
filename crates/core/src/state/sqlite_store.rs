//! SQLite-backed state store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use serde_json::Value;

use super::{validate_namespace, StateError, StateStore};

/// Keeps every namespace's document in a single `ingest_state` table.
pub struct SqliteStateStore {
    conn: Mutex<Connection>,
    read_only: bool,
}

impl SqliteStateStore {
    /// Open (or create) the database file and table.
    pub fn new(path: &Path) -> Result<Self, StateError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StateError::Io {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        let conn = Connection::open(path).map_err(|e| StateError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            read_only: false,
        })
    }

    /// Open an existing database without creating or modifying anything.
    ///
    /// A missing file or table reads as empty state. Saves are rejected.
    pub fn open_read_only(path: &Path) -> Result<Self, StateError> {
        let existing = if path.exists() {
            let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
                .map_err(|e| StateError::Database(e.to_string()))?;
            Self::has_state_table(&conn)?.then_some(conn)
        } else {
            None
        };

        let conn = match existing {
            Some(conn) => conn,
            None => Self::empty_connection()?,
        };
        Ok(Self {
            conn: Mutex::new(conn),
            read_only: true,
        })
    }

    /// In-memory database (useful for testing).
    pub fn in_memory() -> Result<Self, StateError> {
        Ok(Self {
            conn: Mutex::new(Self::empty_connection()?),
            read_only: false,
        })
    }

    fn empty_connection() -> Result<Connection, StateError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StateError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(conn)
    }

    fn has_state_table(conn: &Connection) -> Result<bool, StateError> {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'ingest_state'",
            [],
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count > 0)
        .map_err(|e| StateError::Database(e.to_string()))
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StateError> {
        conn.execute_batch(
            r#"
            PRAGMA synchronous = FULL;

            CREATE TABLE IF NOT EXISTS ingest_state (
                namespace TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| StateError::Database(e.to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StateError> {
        self.conn
            .lock()
            .map_err(|_| StateError::Database("connection mutex poisoned".to_string()))
    }
}

impl StateStore for SqliteStateStore {
    fn load(&self, namespace: &str) -> Result<Option<Value>, StateError> {
        validate_namespace(namespace)?;
        let conn = self.lock()?;

        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM ingest_state WHERE namespace = ?",
                params![namespace],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StateError::Database(e.to_string()))?;

        document
            .map(|doc| {
                serde_json::from_str(&doc).map_err(|e| StateError::Corrupt {
                    namespace: namespace.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    fn save(&self, namespace: &str, document: &Value) -> Result<(), StateError> {
        validate_namespace(namespace)?;
        if self.read_only {
            return Err(StateError::Database(
                "state database is open read-only".to_string(),
            ));
        }
        let json =
            serde_json::to_string(document).map_err(|e| StateError::Serialization(e.to_string()))?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO ingest_state (namespace, document, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(namespace) DO UPDATE SET document = excluded.document, updated_at = excluded.updated_at",
            params![namespace, json, Utc::now().to_rfc3339()],
        )
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_is_none() {
        let store = SqliteStateStore::in_memory().unwrap();
        assert!(store.load("nass_quickstats").unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let store = SqliteStateStore::in_memory().unwrap();

        store.save("src", &json!({"completed": ["a"]})).unwrap();
        store.save("src", &json!({"completed": ["a", "b"]})).unwrap();

        assert_eq!(
            store.load("src").unwrap(),
            Some(json!({"completed": ["a", "b"]}))
        );
    }

    #[test]
    fn test_persists_across_connections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/state.db");

        SqliteStateStore::new(&path)
            .unwrap()
            .save("src", &json!({"completed": ["x"]}))
            .unwrap();

        let reopened = SqliteStateStore::new(&path).unwrap();
        assert_eq!(
            reopened.load("src").unwrap(),
            Some(json!({"completed": ["x"]}))
        );
    }

    #[test]
    fn test_invalid_namespace() {
        let store = SqliteStateStore::in_memory().unwrap();
        assert!(matches!(
            store.save("", &json!({})),
            Err(StateError::InvalidNamespace(_))
        ));
    }

    #[test]
    fn test_read_only_missing_file_is_not_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/state.db");

        let store = SqliteStateStore::open_read_only(&path).unwrap();

        assert!(store.load("nass_quickstats").unwrap().is_none());
        assert!(!path.exists());
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn test_read_only_reads_existing_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.db");
        SqliteStateStore::new(&path)
            .unwrap()
            .save("src", &json!({"completed": ["x"]}))
            .unwrap();
        let modified = std::fs::metadata(&path).unwrap().modified().unwrap();

        let store = SqliteStateStore::open_read_only(&path).unwrap();

        assert_eq!(store.load("src").unwrap(), Some(json!({"completed": ["x"]})));
        assert!(matches!(
            store.save("src", &json!({"completed": []})),
            Err(StateError::Database(_))
        ));
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn test_read_only_without_table_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE unrelated (id INTEGER)")
            .unwrap();

        let store = SqliteStateStore::open_read_only(&path).unwrap();

        assert!(store.load("src").unwrap().is_none());
    }
}
