//! Note management.
//!
//! [`NoteService`] is the single entry point both surfaces (REST and CLI) use to read and
//! change notes. It owns identity and timestamps:
//!
//! - New notes get a fresh UUID and `created = updated = now`.
//! - Updates only touch the patched fields and bump `updated`.
//! - Missing notes are reported as [`NoteError::NotFound`].
//!
//! Storage is behind the [`NoteRepository`] trait, so any backend (or a test double) can be
//! plugged in.

use crate::note::{self, NewNote, Note, NoteId, NotePatch};
use crate::repositories::NoteRepository;
use crate::{NoteError, NoteResult};
use std::sync::Arc;

// ============================================================================
// NOTE SERVICE
// ============================================================================

/// Service for note CRUD operations.
///
/// Cheap to clone; clones share the same repository.
#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    /// List notes, newest first.
    ///
    /// A blank or absent `search` lists every note.
    pub fn get_many(&self, search: Option<&str>) -> NoteResult<Vec<Note>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let notes = self.repo.find_many(search)?;
        tracing::debug!("listed {} notes (search: {:?})", notes.len(), search);
        Ok(notes)
    }

    /// Fetch one note.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::NotFound` if no note has this id.
    pub fn get_one(&self, id: NoteId) -> NoteResult<Note> {
        self.repo.find_one(id)?.ok_or(NoteError::NotFound(id))
    }

    /// Store a new note and return it as persisted.
    pub fn create(&self, new_note: NewNote) -> NoteResult<Note> {
        let note = new_note.into_note(NoteId::new(), note::now());
        self.repo.insert(&note)?;
        tracing::info!("created note {}", note.id);
        Ok(note)
    }

    /// Apply a partial update and return the updated note.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::NotFound` if no note has this id.
    pub fn update(&self, id: NoteId, patch: NotePatch) -> NoteResult<Note> {
        let note = self
            .repo
            .patch(id, patch, note::now())?
            .ok_or(NoteError::NotFound(id))?;

        tracing::info!("updated note {}", id);
        Ok(note)
    }

    /// Delete a note.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::NotFound` if no note has this id.
    pub fn delete(&self, id: NoteId) -> NoteResult<()> {
        if !self.repo.delete(id)? {
            return Err(NoteError::NotFound(id));
        }
        tracing::info!("deleted note {}", id);
        Ok(())
    }

    /// Number of stored notes.
    pub fn count(&self) -> NoteResult<u64> {
        self.repo.count()
    }

    /// `true` if the backing store answers.
    pub fn health(&self) -> bool {
        match self.repo.ping() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("note storage health check failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_db_in_memory;
    use crate::note::{NoteDirection, NoteStatus, NoteType};
    use crate::repositories::SqliteNoteRepository;
    use crate::validation::NoteInput;

    fn service() -> NoteService {
        let conn = open_db_in_memory().expect("open in-memory db");
        NoteService::new(Arc::new(SqliteNoteRepository::new(conn)))
    }

    fn new_note(title: &str, content: &str) -> NewNote {
        NoteInput {
            title: Some(title.into()),
            content: Some(content.into()),
            kind: Some(NoteType::Email),
            address: Some("picard@enterprise.starfleet".into()),
            direction: Some(Some(NoteDirection::Outbound)),
            ..NoteInput::default()
        }
        .into_new_note()
        .expect("valid note")
    }

    #[test]
    fn create_then_get_returns_same_note() {
        let service = service();
        let created = service
            .create(new_note("Orders", "Proceed to Starbase 74 for refit."))
            .expect("create");

        assert_eq!(created.created, created.updated);
        assert_eq!(created.status, NoteStatus::Pending);
        assert_eq!(service.get_one(created.id).expect("get"), created);
        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn update_changes_only_patched_fields() {
        let service = service();
        let created = service
            .create(new_note("Orders", "Proceed to Starbase 74 for refit."))
            .unwrap();

        let patch = NoteInput {
            status: Some(NoteStatus::Success),
            direction: Some(None),
            ..NoteInput::default()
        }
        .into_patch()
        .unwrap();
        let updated = service.update(created.id, patch).expect("update");

        assert_eq!(updated.status, NoteStatus::Success);
        assert_eq!(updated.direction, None);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.kind, created.kind);
        assert_eq!(updated.created, created.created);
        assert!(updated.updated >= created.updated);
        assert_eq!(service.get_one(created.id).unwrap(), updated);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let service = service();
        let id = NoteId::new();

        assert!(matches!(service.get_one(id), Err(NoteError::NotFound(x)) if x == id));
        assert!(matches!(
            service.update(id, NotePatch::default()),
            Err(NoteError::NotFound(_))
        ));
        assert!(matches!(service.delete(id), Err(NoteError::NotFound(_))));
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let service = service();
        let created = service
            .create(new_note("Temp", "Short-lived note for deletion."))
            .unwrap();

        service.delete(created.id).expect("delete");
        assert!(matches!(
            service.get_one(created.id),
            Err(NoteError::NotFound(_))
        ));
    }

    #[test]
    fn blank_search_lists_everything() {
        let service = service();
        service
            .create(new_note("Foo Note 1", "Note 1 content is long enough"))
            .unwrap();
        service
            .create(new_note("Test Note 2", "Note 2 content is long enough"))
            .unwrap();

        assert_eq!(service.get_many(Some("  ")).unwrap().len(), 2);
        assert_eq!(service.get_many(Some("foo")).unwrap().len(), 1);
        assert_eq!(service.get_many(None).unwrap().len(), 2);
    }

    #[test]
    fn health_reports_reachable_store() {
        assert!(service().health());
    }

    #[test]
    fn concurrent_updates_of_different_fields_both_land() {
        use std::sync::Barrier;
        use std::thread;

        let service = service();
        for round in 0..100 {
            let created = service
                .create(new_note("Orders", "Proceed to Starbase 74 for refit."))
                .unwrap();
            let id = created.id;
            let title = format!("Orders revised {round}");
            let barrier = Arc::new(Barrier::new(2));

            let retitle = {
                let (service, barrier) = (service.clone(), barrier.clone());
                let title = title.clone();
                thread::spawn(move || {
                    let patch = NoteInput {
                        title: Some(title),
                        ..NoteInput::default()
                    }
                    .into_patch()
                    .unwrap();
                    barrier.wait();
                    service.update(id, patch).unwrap();
                })
            };
            let resolve = {
                let (service, barrier) = (service.clone(), barrier.clone());
                thread::spawn(move || {
                    let patch = NoteInput {
                        status: Some(NoteStatus::Success),
                        ..NoteInput::default()
                    }
                    .into_patch()
                    .unwrap();
                    barrier.wait();
                    service.update(id, patch).unwrap();
                })
            };
            retitle.join().unwrap();
            resolve.join().unwrap();

            let stored = service.get_one(id).unwrap();
            assert_eq!(stored.title, title, "round {round}");
            assert_eq!(stored.status, NoteStatus::Success, "round {round}");
        }
    }
}
