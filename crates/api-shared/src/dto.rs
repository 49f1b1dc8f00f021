//! Wire DTOs for notes.
//!
//! Incoming bodies go through three steps:
//!
//! 1. [`DtoShape::accept`] for the operation's context drops properties the caller may not
//!    set and rejects bodies missing a required property.
//! 2. Typed deserialisation into [`NotePostDto`] / [`NotePatchDto`] rejects wrong JSON types
//!    and unknown enum values.
//! 3. [`NoteInput`] validation enforces length limits.
//!
//! Every failure surfaces as `NoteError::Validation`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use uhura_core::dto::{DtoBuilder, DtoContext, DtoShape};
use uhura_core::{
    Note, NoteDirection, NoteError, NoteId, NoteInput, NoteResult, NoteStatus, NoteType,
};
use utoipa::ToSchema;

/// A note as returned by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoteGetDto {
    #[schema(value_type = String, format = Uuid)]
    pub id: NoteId,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: NoteType,
    pub address: String,
    pub direction: Option<NoteDirection>,
    pub status: NoteStatus,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<Note> for NoteGetDto {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            kind: note.kind,
            address: note.address,
            direction: note.direction,
            status: note.status,
            created: note.created,
            updated: note.updated,
        }
    }
}

/// Body of `POST /notes`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NotePostDto {
    #[schema(min_length = 1, max_length = 255)]
    pub title: String,
    #[schema(min_length = 20, max_length = 300)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: Option<NoteType>,
    #[serde(default)]
    #[schema(max_length = 255)]
    pub address: Option<String>,
    #[serde(default)]
    pub direction: Option<NoteDirection>,
    #[serde(default)]
    pub status: Option<NoteStatus>,
}

impl From<NotePostDto> for NoteInput {
    fn from(dto: NotePostDto) -> Self {
        NoteInput {
            title: Some(dto.title),
            content: Some(dto.content),
            kind: dto.kind,
            address: dto.address,
            direction: Some(dto.direction),
            status: dto.status,
        }
    }
}

/// Body of `PATCH /notes/{id}`. Absent properties are left unchanged; `"direction": null`
/// clears the direction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NotePatchDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(min_length = 1, max_length = 255)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(min_length = 20, max_length = 300)]
    pub content: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NoteType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(max_length = 255)]
    pub address: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<NoteDirection>, nullable)]
    pub direction: Option<Option<NoteDirection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NoteStatus>,
}

impl From<NotePatchDto> for NoteInput {
    fn from(dto: NotePatchDto) -> Self {
        NoteInput {
            title: dto.title,
            content: dto.content,
            kind: dto.kind,
            address: dto.address,
            direction: dto.direction,
            status: dto.status,
        }
    }
}

// Present-but-null becomes `Some(None)`; absence is handled by `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Shape of notes in responses.
pub fn note_get_shape() -> &'static DtoShape {
    static SHAPE: OnceLock<DtoShape> = OnceLock::new();
    SHAPE.get_or_init(|| DtoBuilder::from::<Note>().use_context(DtoContext::Get).build())
}

/// Shape of `POST /notes` bodies.
pub fn note_post_shape() -> &'static DtoShape {
    static SHAPE: OnceLock<DtoShape> = OnceLock::new();
    SHAPE.get_or_init(|| DtoBuilder::from::<Note>().use_context(DtoContext::Post).build())
}

/// Shape of `PATCH /notes/{id}` bodies.
pub fn note_patch_shape() -> &'static DtoShape {
    static SHAPE: OnceLock<DtoShape> = OnceLock::new();
    SHAPE.get_or_init(|| DtoBuilder::from::<Note>().use_context(DtoContext::Patch).build())
}

/// Turn a raw create body into unvalidated note input.
///
/// # Errors
///
/// Returns `NoteError::Validation` if the body is not an object, lacks `title` or `content`,
/// or has a property of the wrong type.
pub fn accept_post(body: Value) -> NoteResult<NoteInput> {
    let accepted = note_post_shape().accept(body)?;
    let dto: NotePostDto = serde_json::from_value(Value::Object(accepted))
        .map_err(|e| NoteError::invalid(e.to_string()))?;
    Ok(dto.into())
}

/// Turn a raw update body into unvalidated note input.
///
/// # Errors
///
/// Returns `NoteError::Validation` if the body is not an object or has a property of the
/// wrong type.
pub fn accept_patch(body: Value) -> NoteResult<NoteInput> {
    let accepted = note_patch_shape().accept(body)?;
    let dto: NotePatchDto = serde_json::from_value(Value::Object(accepted))
        .map_err(|e| NoteError::invalid(e.to_string()))?;
    Ok(dto.into())
}

/// Serialise a note through the response shape.
pub fn present_note(note: Note) -> NoteResult<Value> {
    let value = serde_json::to_value(NoteGetDto::from(note))?;
    Ok(note_get_shape().project(value))
}

/// Serialise a list of notes through the response shape.
pub fn present_notes(notes: Vec<Note>) -> NoteResult<Value> {
    notes
        .into_iter()
        .map(present_note)
        .collect::<NoteResult<Vec<_>>>()
        .map(Value::Array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_note() -> Note {
        let at = uhura_core::note::now();
        Note {
            id: NoteId::new(),
            title: "Status report".into(),
            content: "All decks report ready for departure.".into(),
            kind: NoteType::Meeting,
            address: "Bridge".into(),
            direction: None,
            status: NoteStatus::Success,
            created: at,
            updated: at,
        }
    }

    #[test]
    fn post_strips_server_managed_and_unknown_properties() {
        let input = accept_post(json!({
            "id": "5ee2a4b6-8b80-4ff0-9a7a-3f7d1e2cbb0b",
            "title": "Hail",
            "content": "Hailing frequencies are open, sir.",
            "created": "2020-01-01T00:00:00Z",
            "text": "unknown",
            "type": "call",
        }))
        .expect("accepted");

        assert_eq!(input.title.as_deref(), Some("Hail"));
        assert_eq!(input.kind, Some(NoteType::Call));
        assert_eq!(input.direction, Some(None));
    }

    #[test]
    fn post_requires_title_and_content() {
        let err = accept_post(json!({ "title": "Only a title" })).expect_err("missing content");
        assert!(matches!(err, NoteError::Validation(_)));
        assert!(err.to_string().contains("content"));

        let err = accept_post(json!({ "title": null, "content": null })).expect_err("nulls");
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn post_rejects_wrong_types_and_unknown_enum_values() {
        for body in [
            json!({ "title": 42, "content": "Long enough content for a note." }),
            json!({ "title": "T", "content": "Long enough content for a note.", "type": "sms" }),
            json!("not an object"),
            Value::Null,
        ] {
            let err = accept_post(body).expect_err("rejected");
            assert!(matches!(err, NoteError::Validation(_)));
        }
    }

    #[test]
    fn patch_distinguishes_absent_and_null_direction() {
        let absent = accept_patch(json!({ "status": "failed" })).unwrap();
        assert_eq!(absent.direction, None);
        assert_eq!(absent.status, Some(NoteStatus::Failed));

        let cleared = accept_patch(json!({ "direction": null })).unwrap();
        assert_eq!(cleared.direction, Some(None));

        let set = accept_patch(json!({ "direction": "inbound" })).unwrap();
        assert_eq!(set.direction, Some(Some(NoteDirection::Inbound)));
    }

    #[test]
    fn patch_ignores_unknown_properties() {
        let input = accept_patch(json!({ "text": "Updated Note 1 content" })).unwrap();
        assert_eq!(input, NoteInput::default());
    }

    #[test]
    fn present_note_exposes_every_get_field() {
        let note = sample_note();
        let value = present_note(note.clone()).expect("present");

        let object = value.as_object().expect("object");
        assert_eq!(object.len(), note_get_shape().fields().len());
        assert_eq!(value["id"], json!(note.id.to_string()));
        assert_eq!(value["type"], json!("meeting"));
        assert_eq!(value["direction"], Value::Null);
    }

    #[test]
    fn present_notes_keeps_order() {
        let first = sample_note();
        let second = sample_note();
        let value = present_notes(vec![first.clone(), second.clone()]).unwrap();

        let ids: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec![first.id.to_string(), second.id.to_string()]);
    }
}
