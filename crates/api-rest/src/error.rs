//! HTTP error mapping.
//!
//! Handlers return [`ApiError`]. Its response carries only the status and an [`ErrorMessage`]
//! extension; the exception filter in [`crate::middleware`] turns that into the JSON
//! [`ErrorEnvelope`] once the request path is known.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uhura_core::NoteError;
use utoipa::ToSchema;

/// Body of every 4xx and 5xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub message: String,
    pub timestamp: String,
    pub path: String,
}

/// Client-facing error message attached to a response as an extension.
#[derive(Clone, Debug)]
pub struct ErrorMessage(pub String);

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg,
            ApiError::Internal => "Internal server error",
        }
    }
}

impl From<NoteError> for ApiError {
    fn from(err: NoteError) -> Self {
        match err {
            NoteError::Validation(_) | NoteError::InvalidId(_) => {
                ApiError::BadRequest(err.to_string())
            }
            NoteError::NotFound(_) => ApiError::NotFound("Note not found".into()),
            other => {
                tracing::error!("Note operation failed: {:?}", other);
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response
            .extensions_mut()
            .insert(ErrorMessage(self.message().to_string()));
        response
    }
}
