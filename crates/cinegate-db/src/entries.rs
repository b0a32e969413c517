//! Key-value entry CRUD operations.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

/// Reads the value stored under `key`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_entry(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM kv_entries WHERE key = ?1",
        [key],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("failed to read entry {key}"))
}

/// Stores `value` under `key`, replacing any previous value.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn set_entry(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        rusqlite::params![key, value],
    )
    .with_context(|| format!("failed to write entry {key}"))?;
    Ok(())
}

/// Deletes the entry under `key`. Missing keys are not an error.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn remove_entry(conn: &Connection, key: &str) -> Result<()> {
    let removed = conn
        .execute("DELETE FROM kv_entries WHERE key = ?1", [key])
        .with_context(|| format!("failed to remove entry {key}"))?;
    tracing::trace!(key, removed, "Removed entry");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::migrations::run_migrations;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_get_missing_entry() {
        // Arrange
        let conn = setup_db();

        // Act
        let value = get_entry(&conn, "moviesList").unwrap();

        // Assert
        assert!(value.is_none());
    }

    #[test]
    fn test_set_then_get() {
        // Arrange
        let conn = setup_db();

        // Act
        set_entry(&conn, "moviesList", r#"[{"imdbID":"tt0372784"}]"#).unwrap();

        // Assert
        assert_eq!(
            get_entry(&conn, "moviesList").unwrap().as_deref(),
            Some(r#"[{"imdbID":"tt0372784"}]"#)
        );
    }

    #[test]
    fn test_set_overwrites_existing_value() {
        // Arrange
        let conn = setup_db();
        set_entry(&conn, "seriesList", "[]").unwrap();

        // Act
        set_entry(&conn, "seriesList", "[1]").unwrap();

        // Assert
        assert_eq!(get_entry(&conn, "seriesList").unwrap().as_deref(), Some("[1]"));
        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM kv_entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_remove_entry() {
        // Arrange
        let conn = setup_db();
        set_entry(&conn, "premieresList", "[]").unwrap();

        // Act
        remove_entry(&conn, "premieresList").unwrap();
        remove_entry(&conn, "premieresList").unwrap();

        // Assert
        assert!(get_entry(&conn, "premieresList").unwrap().is_none());
    }

    #[test]
    fn test_entries_survive_reopen() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cinegate.db");
        let conn = crate::open_db(&path).unwrap();
        set_entry(&conn, "moviesList", "[]").unwrap();
        drop(conn);

        // Act
        let reopened = crate::open_db(&path).unwrap();

        // Assert
        assert_eq!(get_entry(&reopened, "moviesList").unwrap().as_deref(), Some("[]"));
    }
}
