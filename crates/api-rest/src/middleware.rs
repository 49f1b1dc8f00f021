//! Cross-cutting request/response handling: the exception filter and request logging.

use crate::error::{ErrorEnvelope, ErrorMessage};
use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{SecondsFormat, Utc};
use std::time::Instant;

// Largest error body read back when reusing a rejection's text as the message.
const MAX_ERROR_BODY: usize = 64 * 1024;

/// Rewrite every 4xx/5xx response into an [`ErrorEnvelope`].
///
/// The message comes from the [`ErrorMessage`] extension when a handler set one, otherwise
/// from a plain-text body (axum's own rejections), otherwise from the status reason. JSON
/// bodies that were not produced by `ApiError` are left alone.
pub async fn exception_filter(request: Request, next: Next) -> Response {
    let path = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.to_string());

    let response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let message = match parts.extensions.remove::<ErrorMessage>() {
        Some(ErrorMessage(message)) => message,
        None if is_json(&parts.headers) => return Response::from_parts(parts, body),
        None => {
            let text = to_bytes(body, MAX_ERROR_BODY)
                .await
                .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
                .unwrap_or_default();
            if text.is_empty() {
                status.canonical_reason().unwrap_or("Error").to_string()
            } else {
                text
            }
        }
    };

    let envelope = ErrorEnvelope {
        status_code: status.as_u16(),
        message,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        path,
    };
    let bytes = match serde_json::to_vec(&envelope) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Failed to serialise error envelope: {}", e);
            Vec::new()
        }
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Response::from_parts(parts, Body::from(bytes))
}

/// Log each request's start, and its outcome with the elapsed time.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    tracing::debug!("Request: {} => {} started", method, path);

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed = started.elapsed().as_millis();

    if response.status().is_server_error() {
        tracing::error!(
            "Request: {} => {} FAILED with {} after {}ms",
            method,
            path,
            response.status(),
            elapsed
        );
    } else {
        tracing::info!("Request: {} => {} success... {}ms", method, path, elapsed);
    }
    response
}

fn is_json(headers: &axum::http::HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}
