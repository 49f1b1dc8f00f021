//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handlers never read environment variables themselves.

use crate::constants::{
    DEFAULT_DATABASE_PATH, DEFAULT_SERVICE_HOST, DEFAULT_SERVICE_PORT, IN_MEMORY_DATABASE,
};
use crate::{NoteError, NoteResult};
use std::path::{Path, PathBuf};

/// Where notes are stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    service_host: String,
    service_port: u16,
    database: DatabaseLocation,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::InvalidConfig` if the host is blank.
    pub fn new(
        service_host: impl Into<String>,
        service_port: u16,
        database: DatabaseLocation,
    ) -> NoteResult<Self> {
        let service_host = service_host.into();
        if service_host.trim().is_empty() {
            return Err(NoteError::InvalidConfig(
                "service host cannot be empty".into(),
            ));
        }

        Ok(Self {
            service_host,
            service_port,
            database,
        })
    }

    /// Build a configuration from raw (optional) environment values.
    ///
    /// Missing or blank values fall back to the defaults in [`crate::constants`]. Taking the
    /// values as arguments keeps this testable without touching the process environment.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::InvalidConfig` if the port is not a valid `u16`.
    pub fn from_env_values(
        host: Option<String>,
        port: Option<String>,
        database_path: Option<String>,
    ) -> NoteResult<Self> {
        let host = non_blank(host).unwrap_or_else(|| DEFAULT_SERVICE_HOST.into());
        let port = match non_blank(port) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| NoteError::InvalidConfig(format!("SERVICE_PORT '{raw}': {e}")))?,
            None => DEFAULT_SERVICE_PORT,
        };
        let database = database_location_from_value(database_path);

        Self::new(host, port, database)
    }

    /// Resolve the configuration from `SERVICE_HOST`, `SERVICE_PORT` and `UHURA_DATABASE_PATH`.
    pub fn from_env() -> NoteResult<Self> {
        Self::from_env_values(
            std::env::var("SERVICE_HOST").ok(),
            std::env::var("SERVICE_PORT").ok(),
            std::env::var("UHURA_DATABASE_PATH").ok(),
        )
    }

    pub fn service_host(&self) -> &str {
        &self.service_host
    }

    pub fn service_port(&self) -> u16 {
        self.service_port
    }

    /// `host:port` suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.service_host, self.service_port)
    }

    pub fn database(&self) -> &DatabaseLocation {
        &self.database
    }

    /// The database file path, if the store is file backed.
    pub fn database_path(&self) -> Option<&Path> {
        match &self.database {
            DatabaseLocation::File(path) => Some(path),
            DatabaseLocation::InMemory => None,
        }
    }
}

/// Parse the database location from an optional string value.
///
/// `None` or blank selects [`DEFAULT_DATABASE_PATH`]; `":memory:"` selects an in-memory store.
pub fn database_location_from_value(value: Option<String>) -> DatabaseLocation {
    match non_blank(value) {
        Some(v) if v == IN_MEMORY_DATABASE => DatabaseLocation::InMemory,
        Some(v) => DatabaseLocation::File(PathBuf::from(v)),
        None => DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE_PATH)),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
