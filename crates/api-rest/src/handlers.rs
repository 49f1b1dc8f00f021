use crate::error::{ApiError, ErrorEnvelope};
use crate::AppState;
use api_shared::{
    accept_patch, accept_post, present_note, present_notes, HealthReport, IndicatorState,
    NoteGetDto, NotePatchDto, NotePostDto,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::Json;
use serde::Deserialize;
use serde_json::Value;
use uhura_core::NoteId;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive text matched against title or content.
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/notes",
    params(SearchQuery),
    responses(
        (status = 200, description = "Notes, newest first", body = [NoteGetDto]),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "notes"
)]
/// List notes, optionally filtered by `search`.
#[axum::debug_handler]
pub async fn get_many(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let notes = state.notes.get_many(query.search.as_deref())?;
    Ok(Json(present_notes(notes)?))
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(("id" = String, Path, description = "Note id (UUID)")),
    responses(
        (status = 200, description = "The note", body = NoteGetDto),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "Note not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "notes"
)]
#[axum::debug_handler]
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let note = state.notes.get_one(NoteId::parse(&id)?)?;
    Ok(Json(present_note(note)?))
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = NotePostDto,
    responses(
        (status = 201, description = "Note created", body = NoteGetDto),
        (status = 400, description = "Invalid note", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "notes"
)]
/// Create a note.
///
/// Server-managed properties (`id`, `created`, `updated`) and unknown properties in the body
/// are ignored.
#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = body?;
    let new_note = accept_post(body)?.into_new_note()?;
    let note = state.notes.create(new_note)?;
    Ok((StatusCode::CREATED, Json(present_note(note)?)))
}

#[utoipa::path(
    patch,
    path = "/notes/{id}",
    params(("id" = String, Path, description = "Note id (UUID)")),
    request_body = NotePatchDto,
    responses(
        (status = 200, description = "Note updated", body = NoteGetDto),
        (status = 400, description = "Invalid id or note", body = ErrorEnvelope),
        (status = 404, description = "Note not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "notes"
)]
/// Partially update a note. Only the properties present in the body change.
#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = NoteId::parse(&id)?;
    let Json(body) = body?;
    let patch = accept_patch(body)?.into_patch()?;
    let note = state.notes.update(id, patch)?;
    Ok(Json(present_note(note)?))
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(("id" = String, Path, description = "Note id (UUID)")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "Note not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "notes"
)]
#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.notes.delete(NoteId::parse(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "All indicators up", body = HealthReport),
        (status = 503, description = "At least one indicator down", body = HealthReport)
    ),
    tag = "health"
)]
/// Health check endpoint for the REST API
///
/// Reports the `application` indicator with its uptime and a `database` indicator backed by a
/// storage ping. Used by monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let database = if state.notes.health() {
        IndicatorState::up()
    } else {
        IndicatorState::down("database ping failed")
    };

    let report = state.health.check([("database", database)]);
    let status = if report.is_ok() {
        StatusCode::OK
    } else {
        tracing::warn!("Health check failed: {:?}", report.error);
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

/// Fallback for unmatched routes.
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(format!("Cannot {} {}", method, uri.path()))
}
