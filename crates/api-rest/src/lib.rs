//! # API REST
//!
//! REST API implementation for Uhura.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (error envelope, request logging, CORS, version header)
//!
//! Uses `api-shared` for the wire DTOs and the health report.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;
pub mod middleware;

use api_shared::{
    HealthReport, HealthService, HealthStatus, IndicatorState, IndicatorStatus, NoteGetDto,
    NotePatchDto, NotePostDto,
};
use axum::http::{HeaderName, HeaderValue};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use uhura_core::{NoteDirection, NoteService, NoteStatus, NoteType};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::{ApiError, ErrorEnvelope};

/// Header carrying `<package-name>/<package-version>` on every response.
pub const APPLICATION_VERSION_HEADER: &str = "x-application-version";

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
    pub health: HealthService,
    /// Value of the `X-Application-Version` header.
    pub version: &'static str,
}

impl AppState {
    pub fn new(notes: NoteService) -> Self {
        Self {
            notes,
            health: HealthService::new(),
            version: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Override the reported application version, e.g. with the binary's own package.
    pub fn with_version(mut self, version: &'static str) -> Self {
        self.version = version;
        self
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Uhura", description = "Note-taking service for logged communications"),
    paths(
        handlers::get_many,
        handlers::get_one,
        handlers::create,
        handlers::update,
        handlers::delete,
        handlers::health,
    ),
    components(schemas(
        NoteGetDto,
        NotePostDto,
        NotePatchDto,
        NoteType,
        NoteDirection,
        NoteStatus,
        HealthReport,
        HealthStatus,
        IndicatorState,
        IndicatorStatus,
        ErrorEnvelope,
    )),
    tags(
        (name = "notes", description = "Note management"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Build the REST router with every route, the Swagger UI and the global layers.
pub fn router(state: AppState) -> Router {
    let version = HeaderValue::from_static(state.version);

    Router::new()
        .route("/notes", get(handlers::get_many).post(handlers::create))
        .route(
            "/notes/:id",
            get(handlers::get_one)
                .patch(handlers::update)
                .delete(handlers::delete),
        )
        .route("/health", get(handlers::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn(middleware::exception_filter))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(APPLICATION_VERSION_HEADER),
            version,
        ))
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .with_state(state)
}
