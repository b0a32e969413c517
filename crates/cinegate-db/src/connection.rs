//! Opening the cache database.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations::run_migrations;

/// How long a write waits on another session's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the cache database at `path` and brings its schema
/// up to date. Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or migrations fail.
pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("failed to set busy timeout")?;
    run_migrations(&conn).context("database migration failed")?;

    tracing::debug!(path = %path.display(), "Opened cache database");
    Ok(conn)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_open_db_migrates_new_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        // Act
        let conn = open_db(&path).unwrap();

        // Assert
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert!(version > 0);
        assert!(path.exists());
    }

    #[test]
    fn test_open_db_creates_missing_parents() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("share").join("cinegate").join("cinegate.db");

        // Act & Assert
        open_db(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_db_rejects_directory_path() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();

        // Act
        let result = open_db(dir.path());

        // Assert
        assert!(result.is_err());
    }
}
