//! Schema migrations for the note store.
//!
//! Each migration is an embedded SQL script with a version and a short name. Pending scripts
//! run in order inside one transaction, and the schema version lives in `PRAGMA user_version`.
//! A database stamped with a version this binary does not know is refused rather than touched.

use crate::{NoteError, NoteResult};
use rusqlite::{Connection, Transaction};
use std::cmp::Ordering;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create note table",
    sql: include_str!("0001_init.sql"),
}];

/// Schema version this binary migrates to.
pub fn latest_version() -> u32 {
    MIGRATIONS.iter().map(|m| m.version).max().unwrap_or(0)
}

/// Bring the note schema up to [`latest_version`].
///
/// # Errors
///
/// Returns `NoteError::UnsupportedSchemaVersion` for a database stamped by a newer binary, or
/// `NoteError::Database` if a script fails. A failed run leaves the schema untouched.
pub fn apply_migrations(conn: &mut Connection) -> NoteResult<()> {
    let from = current_user_version(conn)?;
    let to = latest_version();

    match from.cmp(&to) {
        Ordering::Equal => {
            tracing::debug!("note schema is current at version {}", from);
            Ok(())
        }
        Ordering::Greater => Err(NoteError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        }),
        Ordering::Less => {
            let tx = conn.transaction()?;
            for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
                run(&tx, migration)?;
            }
            tx.commit()?;
            tracing::info!("note schema upgraded from version {} to {}", from, to);
            Ok(())
        }
    }
}

fn run(tx: &Transaction<'_>, migration: &Migration) -> NoteResult<()> {
    tracing::debug!(
        "running migration {} ({})",
        migration.version,
        migration.name
    );
    tx.execute_batch(migration.sql).map_err(|e| {
        tracing::error!(
            "migration {} ({}) failed: {}",
            migration.version,
            migration.name,
            e
        );
        e
    })?;
    tx.pragma_update(None, "user_version", migration.version)?;
    Ok(())
}

pub(crate) fn current_user_version(conn: &Connection) -> NoteResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_is_migrated_to_latest() {
        let mut conn = Connection::open_in_memory().expect("open in-memory db");
        apply_migrations(&mut conn).expect("migrations apply");

        assert_eq!(current_user_version(&conn).unwrap(), latest_version());

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'note';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn applying_twice_is_a_no_op() {
        let mut conn = Connection::open_in_memory().expect("open in-memory db");
        apply_migrations(&mut conn).expect("first run");
        apply_migrations(&mut conn).expect("second run");

        assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut conn = Connection::open_in_memory().expect("open in-memory db");
        conn.pragma_update(None, "user_version", 999).unwrap();

        let err = apply_migrations(&mut conn).expect_err("newer schema");
        assert!(matches!(
            err,
            NoteError::UnsupportedSchemaVersion {
                db_version: 999,
                ..
            }
        ));
    }

    #[test]
    fn failed_script_rolls_back_everything() {
        let mut conn = Connection::open_in_memory().expect("open in-memory db");
        conn.execute_batch("CREATE TABLE note (id TEXT);").unwrap();

        apply_migrations(&mut conn).expect_err("note table already exists with another shape");

        assert_eq!(current_user_version(&conn).unwrap(), 0);
        let indexes: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'idx_note_created';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(indexes, 0);
    }

    #[test]
    fn migration_versions_are_strictly_increasing() {
        let versions: Vec<u32> = MIGRATIONS.iter().map(|m| m.version).collect();
        assert!(versions.windows(2).all(|w| w[0] < w[1]), "{versions:?}");
        assert_eq!(versions.last().copied(), Some(latest_version()));
    }

    #[test]
    fn check_constraints_reject_unknown_enum_values() {
        let mut conn = Connection::open_in_memory().expect("open in-memory db");
        apply_migrations(&mut conn).expect("migrations apply");

        let result = conn.execute(
            "INSERT INTO note (id, title, content, type, created, updated)
             VALUES ('x', 't', 'c', 'telegram', 'now', 'now');",
            [],
        );
        assert!(result.is_err());
    }
}
