//! # API Shared
//!
//! Shared definitions for the Uhura APIs.
//!
//! Contains:
//! - Wire DTOs for notes (`NoteGetDto`, `NotePostDto`, `NotePatchDto`) and the request
//!   pipeline that turns a raw JSON body into validated input
//! - `HealthService` and its terminus-style report
//!
//! Used by `api-rest`; kept separate so another surface can reuse the same wire contract.

pub mod dto;
pub mod health;

pub use dto::{
    accept_patch, accept_post, note_get_shape, note_patch_shape, note_post_shape, present_note,
    present_notes, NoteGetDto, NotePatchDto, NotePostDto,
};
pub use health::{HealthReport, HealthService, HealthStatus, IndicatorState, IndicatorStatus};
