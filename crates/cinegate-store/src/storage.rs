//! Durable key-value capability behind the catalog store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use rusqlite::Connection;

/// String key-value storage that outlives the process (or not, for tests).
pub trait KeyValueStore: Send + Sync {
    /// Reads the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(String::from(key), String::from(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// `SQLite`-backed storage (see `cinegate-db`).
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens the cache database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = cinegate_db::open_db(path).context("failed to open cache database")?;
        Ok(Self::from_connection(conn))
    }

    /// Wraps an already migrated connection.
    #[must_use]
    pub const fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl KeyValueStore for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        cinegate_db::get_entry(&conn, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        cinegate_db::set_entry(&conn, key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        cinegate_db::remove_entry(&conn, key)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn exercise(storage: &dyn KeyValueStore) {
        assert!(storage.get("moviesList").unwrap().is_none());

        storage.set("moviesList", "[]").unwrap();
        assert_eq!(storage.get("moviesList").unwrap().as_deref(), Some("[]"));

        storage.set("moviesList", "[{}]").unwrap();
        assert_eq!(storage.get("moviesList").unwrap().as_deref(), Some("[{}]"));

        storage.remove("moviesList").unwrap();
        assert!(storage.get("moviesList").unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_contract() {
        // Arrange
        let storage = MemoryStorage::new();

        // Act & Assert
        exercise(&storage);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_sqlite_storage_contract() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::open(&dir.path().join("cache.db")).unwrap();

        // Act & Assert
        exercise(&storage);
    }

    #[test]
    fn test_sqlite_storage_persists_across_instances() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");
        SqliteStorage::open(&path)
            .unwrap()
            .set("seriesList", r#"[{"imdbID":"tt0944947"}]"#)
            .unwrap();

        // Act
        let reopened = SqliteStorage::open(&path).unwrap();

        // Assert
        assert_eq!(
            reopened.get("seriesList").unwrap().as_deref(),
            Some(r#"[{"imdbID":"tt0944947"}]"#)
        );
    }

    #[test]
    fn test_arc_storage_shares_entries() {
        // Arrange
        let shared = Arc::new(MemoryStorage::new());
        let handle = Arc::clone(&shared);

        // Act
        handle.set("premieresList", "[]").unwrap();

        // Assert
        assert_eq!(shared.len(), 1);
    }
}
