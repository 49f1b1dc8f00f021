//! The note entity and its enumerations.
//!
//! A note records a single logged communication: a call, a fax, an email, a meeting and so on.
//! The JSON form uses lowercase enum names and the key `type` for [`NoteType`].

use crate::constants::{ADDRESS_MAX_LEN, CONTENT_MAX_LEN, CONTENT_MIN_LEN, TITLE_MAX_LEN};
use crate::dto::{DtoContext, DtoEntity, DtoProperty};
use crate::{NoteError, NoteResult};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uhura_types::BoundedText;
use utoipa::ToSchema;
use uuid::Uuid;

/// Validated note title.
pub type NoteTitle = BoundedText<1, TITLE_MAX_LEN>;

/// Validated note content.
pub type NoteContent = BoundedText<CONTENT_MIN_LEN, CONTENT_MAX_LEN>;

/// Validated note address; may be empty.
pub type NoteAddress = BoundedText<0, ADDRESS_MAX_LEN>;

/// Opaque note identifier (UUID v4, hyphenated in its string form).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier supplied by a caller.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::InvalidId` if `input` is not a UUID.
    pub fn parse(input: &str) -> NoteResult<Self> {
        Uuid::parse_str(input.trim())
            .map(Self)
            .map_err(|_| NoteError::InvalidId(input.to_string()))
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for NoteId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for NoteId {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Declares a lowercase string-backed enum with `as_str`, `Display` and `FromStr`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = NoteError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(NoteError::invalid(format!(
                        "unknown {} '{}' (expected one of: {})",
                        $label,
                        other,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }
    };
}

string_enum! {
    /// The kind of communication a note records.
    NoteType, "note type" {
        Call => "call",
        Fax => "fax",
        Email => "email",
        Mail => "mail",
        Meeting => "meeting",
        Submission => "submission",
        Other => "other",
    }
}

string_enum! {
    /// Whether the communication was received or sent.
    NoteDirection, "note direction" {
        Inbound => "inbound",
        Outbound => "outbound",
    }
}

string_enum! {
    /// Outcome of the communication.
    NoteStatus, "note status" {
        Success => "success",
        Pending => "pending",
        Failed => "failed",
        Incomplete => "incomplete",
    }
}

impl Default for NoteType {
    fn default() -> Self {
        Self::Other
    }
}

impl Default for NoteStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// A stored note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
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

impl DtoEntity for Note {
    const NAME: &'static str = "Note";

    fn dto_properties() -> Vec<DtoProperty> {
        use DtoContext::{Get, Patch, Post};

        vec![
            DtoProperty::new("id").include([Get]).exclude([Post, Patch]),
            DtoProperty::new("title")
                .allow([Patch])
                .include([Get])
                .require([Post]),
            DtoProperty::new("content")
                .allow([Patch])
                .include([Get])
                .require([Post]),
            DtoProperty::new("type").allow([Post, Patch]).include([Get]),
            DtoProperty::new("address").allow([Post, Patch]).include([Get]),
            DtoProperty::new("direction").allow([Post, Patch]).include([Get]),
            DtoProperty::new("status").allow([Post, Patch]).include([Get]),
            DtoProperty::new("created").exclude([Post, Patch]).include([Get]),
            DtoProperty::new("updated").exclude([Post, Patch]).include([Get]),
        ]
    }
}

/// Current time truncated to the millisecond precision notes are stored with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Validated input for creating a note.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewNote {
    pub title: NoteTitle,
    pub content: NoteContent,
    pub kind: NoteType,
    pub address: NoteAddress,
    pub direction: Option<NoteDirection>,
    pub status: NoteStatus,
}

impl NewNote {
    /// Turn the input into a stored note with the given identity and timestamp.
    pub fn into_note(self, id: NoteId, at: DateTime<Utc>) -> Note {
        Note {
            id,
            title: self.title.into_inner(),
            content: self.content.into_inner(),
            kind: self.kind,
            address: self.address.into_inner(),
            direction: self.direction,
            status: self.status,
            created: at,
            updated: at,
        }
    }
}

/// Validated partial update. `None` leaves a field untouched.
///
/// `direction` is doubly optional: `Some(None)` clears the direction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<NoteTitle>,
    pub content: Option<NoteContent>,
    pub kind: Option<NoteType>,
    pub address: Option<NoteAddress>,
    pub direction: Option<Option<NoteDirection>>,
    pub status: Option<NoteStatus>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the present fields to `note` and stamp `updated`.
    ///
    /// `updated` never moves backwards, even if `at` precedes the stored value.
    pub fn apply(self, note: &mut Note, at: DateTime<Utc>) {
        if let Some(title) = self.title {
            note.title = title.into_inner();
        }
        if let Some(content) = self.content {
            note.content = content.into_inner();
        }
        if let Some(kind) = self.kind {
            note.kind = kind;
        }
        if let Some(address) = self.address {
            note.address = address.into_inner();
        }
        if let Some(direction) = self.direction {
            note.direction = direction;
        }
        if let Some(status) = self.status {
            note.status = status;
        }
        note.updated = at.max(note.updated);
    }
}
