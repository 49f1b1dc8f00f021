use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use uhura_core::{
    db::open_location, CoreConfig, DatabaseLocation, NoteService, SqliteNoteRepository,
};

/// Main entry point for the Uhura application
///
/// Starts the REST server (with Swagger UI) on the configured address.
///
/// # Environment Variables
/// - `SERVICE_HOST`: bind host (default: "0.0.0.0")
/// - `SERVICE_PORT`: bind port (default: 3000)
/// - `UHURA_DATABASE_PATH`: SQLite database file (default: "uhura.db", ":memory:" for in-memory)
/// - `RUST_LOG`: extra tracing directives
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, storage or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("uhura_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("uhura_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env()?;
    match cfg.database() {
        DatabaseLocation::File(path) => tracing::info!("Using database {}", path.display()),
        DatabaseLocation::InMemory => {
            tracing::warn!("Using in-memory database, notes will not persist")
        }
    }

    let conn = open_location(cfg.database())?;
    let notes = NoteService::new(Arc::new(SqliteNoteRepository::new(conn)));
    let state = AppState::new(notes)
        .with_version(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

    let rest_addr = cfg.bind_addr();
    tracing::info!("++ Starting Uhura REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, api_rest::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Uhura REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
