//! Note repository contract and its SQLite implementation.
//!
//! ## Storage
//!
//! Notes live in the `note` table, one row per note. Enumerations are stored as their
//! lowercase names and timestamps as RFC 3339 text with millisecond precision, which keeps
//! lexical and chronological order identical.
//!
//! ## Search
//!
//! `find_many` with a search term matches against title or content after Unicode lowercasing
//! both sides, so `é` finds `É`. The term is matched literally; there are no wildcards.

use crate::constants::NOTE_TABLE_NAME;
use crate::note::{Note, NoteDirection, NoteId, NotePatch};
use crate::{db, NoteError, NoteResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// Persistence operations for notes.
///
/// Implementations must be shareable across request handlers.
pub trait NoteRepository: Send + Sync {
    /// All notes, newest first, optionally filtered by a search term.
    fn find_many(&self, search: Option<&str>) -> NoteResult<Vec<Note>>;

    /// One note by id, or `None`.
    fn find_one(&self, id: NoteId) -> NoteResult<Option<Note>>;

    /// Store a new note.
    fn insert(&self, note: &Note) -> NoteResult<()>;

    /// Overwrite an existing note. Returns `false` if no row matched.
    fn update(&self, note: &Note) -> NoteResult<bool>;

    /// Apply `patch` to the stored note and persist it, reading and writing under one lock so
    /// concurrent patches never overwrite each other. Returns `None` if no row matched.
    fn patch(&self, id: NoteId, patch: NotePatch, at: DateTime<Utc>) -> NoteResult<Option<Note>>;

    /// Remove a note. Returns `false` if no row matched.
    fn delete(&self, id: NoteId) -> NoteResult<bool>;

    /// Number of stored notes.
    fn count(&self) -> NoteResult<u64>;

    /// Check the backing store is reachable.
    fn ping(&self) -> NoteResult<()>;
}

/// SQLite-backed note repository sharing a single connection.
#[derive(Clone)]
pub struct SqliteNoteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteNoteRepository {
    /// Wrap a migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn conn(&self) -> NoteResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| NoteError::StoragePoisoned)
    }
}

const SELECT_COLUMNS: &str =
    "id, title, content, type, address, direction, status, created, updated";

impl NoteRepository for SqliteNoteRepository {
    fn find_many(&self, search: Option<&str>) -> NoteResult<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM {NOTE_TABLE_NAME}
             ORDER BY created DESC, id ASC;"
        ))?;

        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut notes = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let note = note_from_row(row)?;
            if needle.as_deref().map_or(true, |n| matches_search(&note, n)) {
                notes.push(note);
            }
        }

        Ok(notes)
    }

    fn find_one(&self, id: NoteId) -> NoteResult<Option<Note>> {
        let conn = self.conn()?;
        select_one(&conn, id)
    }

    fn insert(&self, note: &Note) -> NoteResult<()> {
        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO {NOTE_TABLE_NAME}
                 (id, title, content, type, address, direction, status, created, updated)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);"
            ),
            params![
                note.id.to_string(),
                note.title,
                note.content,
                note.kind.as_str(),
                note.address,
                note.direction.map(|d| d.as_str()),
                note.status.as_str(),
                format_timestamp(&note.created),
                format_timestamp(&note.updated),
            ],
        )?;
        Ok(())
    }

    fn update(&self, note: &Note) -> NoteResult<bool> {
        let conn = self.conn()?;
        write_note(&conn, note)
    }

    fn patch(&self, id: NoteId, patch: NotePatch, at: DateTime<Utc>) -> NoteResult<Option<Note>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let Some(mut note) = select_one(&tx, id)? else {
            return Ok(None);
        };
        patch.apply(&mut note, at);
        if !write_note(&tx, &note)? {
            return Ok(None);
        }

        tx.commit()?;
        Ok(Some(note))
    }

    fn delete(&self, id: NoteId) -> NoteResult<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            &format!("DELETE FROM {NOTE_TABLE_NAME} WHERE id = ?1;"),
            params![id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn count(&self) -> NoteResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {NOTE_TABLE_NAME};"),
            [],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn ping(&self) -> NoteResult<()> {
        let conn = self.conn()?;
        db::ping(&conn)
    }
}

fn select_one(conn: &Connection, id: NoteId) -> NoteResult<Option<Note>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM {NOTE_TABLE_NAME} WHERE id = ?1;"
    ))?;

    let mut rows = stmt.query(params![id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(note_from_row(row)?)),
        None => Ok(None),
    }
}

// `created` is never rewritten.
fn write_note(conn: &Connection, note: &Note) -> NoteResult<bool> {
    let changed = conn.execute(
        &format!(
            "UPDATE {NOTE_TABLE_NAME}
             SET title = ?2,
                 content = ?3,
                 type = ?4,
                 address = ?5,
                 direction = ?6,
                 status = ?7,
                 updated = ?8
             WHERE id = ?1;"
        ),
        params![
            note.id.to_string(),
            note.title,
            note.content,
            note.kind.as_str(),
            note.address,
            note.direction.map(|d| d.as_str()),
            note.status.as_str(),
            format_timestamp(&note.updated),
        ],
    )?;
    Ok(changed > 0)
}

/// `needle` must already be lowercased.
fn matches_search(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle) || note.content.to_lowercase().contains(needle)
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(column: &str, raw: &str) -> NoteResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| NoteError::Corrupt(format!("{column} '{raw}': {e}")))
}

fn note_from_row(row: &Row<'_>) -> NoteResult<Note> {
    let id: String = row.get("id")?;
    let kind: String = row.get("type")?;
    let direction: Option<String> = row.get("direction")?;
    let status: String = row.get("status")?;
    let created: String = row.get("created")?;
    let updated: String = row.get("updated")?;

    let corrupt = |e: NoteError| NoteError::Corrupt(format!("note {id}: {e}"));

    Ok(Note {
        id: NoteId::parse(&id).map_err(corrupt)?,
        title: row.get("title")?,
        content: row.get("content")?,
        kind: kind.parse().map_err(corrupt)?,
        address: row.get("address")?,
        direction: direction
            .as_deref()
            .map(str::parse::<NoteDirection>)
            .transpose()
            .map_err(corrupt)?,
        status: status.parse().map_err(corrupt)?,
        created: parse_timestamp("created", &created)?,
        updated: parse_timestamp("updated", &updated)?,
    })
}
