//! Human-readable rendering of note metadata.
//!
//! Used by the CLI to describe a note in one line, e.g. `inbound call from +1 555 0100`, and
//! to turn an address into a link a browser or phone can open.

use crate::note::{Note, NoteDirection, NoteType};

/// One-line summary of a note's direction, type and address.
///
/// The direction is omitted when unset and the address clause is omitted when the address is
/// empty.
pub fn metadata_text(note: &Note) -> String {
    let mut text = match note.direction {
        Some(direction) => format!("{direction} {}", note.kind),
        None => note.kind.to_string(),
    };

    if !note.address.is_empty() {
        let preposition = match note.kind {
            NoteType::Meeting => "at",
            NoteType::Other => "for",
            _ if note.direction == Some(NoteDirection::Inbound) => "from",
            _ => "to",
        };
        text.push(' ');
        text.push_str(preposition);
        text.push(' ');
        text.push_str(&note.address);
    }

    text
}

/// A URL for the note's address, if its type has one.
pub fn address_url(note: &Note) -> Option<String> {
    if note.address.is_empty() {
        return None;
    }

    let address = &note.address;
    match note.kind {
        NoteType::Mail | NoteType::Meeting => {
            Some(format!("https://maps.google.com/?q={address}"))
        }
        NoteType::Call => Some(format!("tel:{address}")),
        NoteType::Fax => Some(format!("fax:{address}")),
        NoteType::Email => Some(format!("mailto:{address}")),
        NoteType::Submission | NoteType::Other => None,
    }
}
