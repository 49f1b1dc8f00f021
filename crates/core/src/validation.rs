//! Input validation utilities.
//!
//! Surfaces (REST, CLI) collect raw field values into a [`NoteInput`] and validate it here, so
//! both reject the same inputs with the same messages. Every violation is reported, not just
//! the first.

use crate::note::{
    NewNote, NoteAddress, NoteContent, NoteDirection, NotePatch, NoteStatus, NoteTitle, NoteType,
};
use crate::{NoteError, NoteResult};
use std::fmt::Display;
use std::str::FromStr;

/// Raw, unvalidated note fields.
///
/// `direction` is doubly optional so that a partial update can distinguish "leave unchanged"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub kind: Option<NoteType>,
    pub address: Option<String>,
    pub direction: Option<Option<NoteDirection>>,
    pub status: Option<NoteStatus>,
}

impl NoteInput {
    /// Validate the input for note creation.
    ///
    /// `title` and `content` are required. Missing optional fields take their defaults:
    /// type `other`, empty address, no direction, status `pending`.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::Validation` listing every violation.
    pub fn into_new_note(self) -> NoteResult<NewNote> {
        let mut violations = Violations::default();

        let title = match self.title {
            Some(raw) => violations.check::<NoteTitle>("title", &raw),
            None => violations.missing("title"),
        };
        let content = match self.content {
            Some(raw) => violations.check::<NoteContent>("content", &raw),
            None => violations.missing("content"),
        };
        let address =
            violations.check::<NoteAddress>("address", self.address.as_deref().unwrap_or(""));

        violations.finish()?;

        match (title, content, address) {
            (Some(title), Some(content), Some(address)) => Ok(NewNote {
                title,
                content,
                kind: self.kind.unwrap_or_default(),
                address,
                direction: self.direction.flatten(),
                status: self.status.unwrap_or_default(),
            }),
            _ => Err(NoteError::invalid("note is incomplete")),
        }
    }

    /// Validate the input as a partial update. Absent fields stay absent.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::Validation` listing every violation.
    pub fn into_patch(self) -> NoteResult<NotePatch> {
        let mut violations = Violations::default();

        let title = self
            .title
            .and_then(|raw| violations.check::<NoteTitle>("title", &raw));
        let content = self
            .content
            .and_then(|raw| violations.check::<NoteContent>("content", &raw));
        let address = self
            .address
            .and_then(|raw| violations.check::<NoteAddress>("address", &raw));

        violations.finish()?;

        Ok(NotePatch {
            title,
            content,
            kind: self.kind,
            address,
            direction: self.direction,
            status: self.status,
        })
    }
}

#[derive(Default)]
struct Violations(Vec<String>);

impl Violations {
    fn check<T>(&mut self, field: &str, raw: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(e) => {
                self.0.push(format!("{field}: {e}"));
                None
            }
        }
    }

    fn missing<T>(&mut self, field: &str) -> Option<T> {
        self.0.push(format!("{field}: is required"));
        None
    }

    fn finish(self) -> NoteResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(NoteError::Validation(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(len: usize) -> String {
        "x".repeat(len)
    }

    fn messages(err: NoteError) -> Vec<String> {
        match err {
            NoteError::Validation(messages) => messages,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn new_note_applies_defaults() {
        let new_note = NoteInput {
            title: Some("  Away team report ".into()),
            content: Some(content(20)),
            ..NoteInput::default()
        }
        .into_new_note()
        .expect("valid input");

        assert_eq!(new_note.title.as_str(), "Away team report");
        assert_eq!(new_note.kind, NoteType::Other);
        assert_eq!(new_note.status, NoteStatus::Pending);
        assert_eq!(new_note.direction, None);
        assert!(new_note.address.is_empty());
    }

    #[test]
    fn new_note_requires_title_and_content() {
        let err = NoteInput::default()
            .into_new_note()
            .expect_err("empty input");

        let messages = messages(err);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("title"));
        assert!(messages[1].starts_with("content"));
    }

    #[test]
    fn content_length_bounds_are_enforced() {
        for len in [19, 301] {
            let err = NoteInput {
                title: Some("Title".into()),
                content: Some(content(len)),
                ..NoteInput::default()
            }
            .into_new_note()
            .expect_err("content out of bounds");
            assert!(messages(err)[0].starts_with("content"));
        }

        for len in [20, 300] {
            NoteInput {
                title: Some("Title".into()),
                content: Some(content(len)),
                ..NoteInput::default()
            }
            .into_new_note()
            .expect("content within bounds");
        }
    }

    #[test]
    fn patch_keeps_absent_fields_absent() {
        let patch = NoteInput {
            status: Some(NoteStatus::Failed),
            direction: Some(None),
            ..NoteInput::default()
        }
        .into_patch()
        .expect("valid patch");

        assert_eq!(patch.title, None);
        assert_eq!(patch.content, None);
        assert_eq!(patch.status, Some(NoteStatus::Failed));
        assert_eq!(patch.direction, Some(None));
    }

    #[test]
    fn patch_validates_present_fields() {
        let err = NoteInput {
            title: Some("   ".into()),
            content: Some(content(5)),
            ..NoteInput::default()
        }
        .into_patch()
        .expect_err("blank title and short content");

        assert_eq!(messages(err).len(), 2);
    }

    #[test]
    fn empty_patch_is_valid() {
        let patch = NoteInput::default().into_patch().expect("empty patch");
        assert!(patch.is_empty());
    }
}
