//! Repository layer.
//!
//! Repositories own persistence only. Validation, identity and timestamps are decided by the
//! services above them.

pub mod notes;

pub use notes::{NoteRepository, SqliteNoteRepository};
