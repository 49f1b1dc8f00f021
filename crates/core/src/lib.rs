//! # Uhura Core
//!
//! Core business logic for the Uhura note-taking service.
//!
//! This crate contains the note model and every operation on it:
//! - Note entity, enumerations and validation
//! - DTO shape derivation per operation context
//! - SQLite storage with versioned migrations
//! - The [`NoteService`] used by both the REST API and the CLI
//!
//! **No API concerns**: HTTP servers, routing and response envelopes belong in `api-rest` or
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod db;
pub mod dto;
pub mod error;
pub mod note;
pub mod presentation;
pub mod repositories;
pub mod service;
pub mod validation;

pub use config::{CoreConfig, DatabaseLocation};
pub use dto::{DtoBuilder, DtoContext, DtoDirective, DtoEntity, DtoError, DtoShape};
pub use error::{NoteError, NoteResult};
pub use note::{NewNote, Note, NoteDirection, NoteId, NotePatch, NoteStatus, NoteType};
pub use repositories::{NoteRepository, SqliteNoteRepository};
pub use service::NoteService;
pub use uhura_types::{BoundedText, NonEmptyText, TextError};
pub use validation::NoteInput;

impl From<DtoError> for NoteError {
    fn from(err: DtoError) -> Self {
        NoteError::Validation(vec![err.to_string()])
    }
}
