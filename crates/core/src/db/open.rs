//! Connection bootstrap utilities for SQLite.

use super::migrations::apply_migrations;
use crate::config::DatabaseLocation;
use crate::NoteResult;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a migration fails.
pub fn open_db(path: impl AsRef<Path>) -> NoteResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    tracing::debug!("opening database {}", path.display());

    let mut conn = Connection::open(path).map_err(|e| {
        tracing::error!("failed to open database {}: {}", path.display(), e);
        e
    })?;
    bootstrap_connection(&mut conn)?;

    tracing::info!(
        "database {} ready in {}ms",
        path.display(),
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

/// Opens an in-memory SQLite database and applies all pending migrations.
pub fn open_db_in_memory() -> NoteResult<Connection> {
    let mut conn = Connection::open_in_memory()?;
    bootstrap_connection(&mut conn)?;
    tracing::debug!("in-memory database ready");
    Ok(conn)
}

/// Opens the database described by a configured [`DatabaseLocation`].
pub fn open_location(location: &DatabaseLocation) -> NoteResult<Connection> {
    match location {
        DatabaseLocation::File(path) => open_db(path),
        DatabaseLocation::InMemory => open_db_in_memory(),
    }
}

/// Liveness check: runs a trivial query.
pub fn ping(conn: &Connection) -> NoteResult<()> {
    conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}

fn bootstrap_connection(conn: &mut Connection) -> NoteResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::{current_user_version, latest_version};
    use tempfile::TempDir;

    #[test]
    fn file_database_is_created_and_migrated() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("notes.db");

        let conn = open_db(&path).expect("open file db");

        assert!(path.is_file(), "database file should exist");
        assert_eq!(current_user_version(&conn).unwrap(), latest_version());
        ping(&conn).expect("ping succeeds");
    }

    #[test]
    fn reopening_keeps_schema_version() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("notes.db");

        drop(open_db(&path).expect("first open"));
        let conn = open_db(&path).expect("second open");

        assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn in_memory_location_opens() {
        let conn = open_location(&DatabaseLocation::InMemory).expect("open in-memory");
        ping(&conn).expect("ping succeeds");
    }
}
