//! Constants used throughout the Uhura core crate.
//!
//! Field limits, storage names and configuration defaults live here so the service, the
//! validation layer and the CLI agree on them.

/// Name of the SQLite table holding notes.
pub const NOTE_TABLE_NAME: &str = "note";

/// Default SQLite database path when `UHURA_DATABASE_PATH` is not set.
pub const DEFAULT_DATABASE_PATH: &str = "uhura.db";

/// Database path value that selects an in-memory store.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

/// Default bind host for the REST service.
pub const DEFAULT_SERVICE_HOST: &str = "0.0.0.0";

/// Default bind port for the REST service.
pub const DEFAULT_SERVICE_PORT: u16 = 3000;

/// Maximum title length in characters.
pub const TITLE_MAX_LEN: usize = 255;

/// Minimum content length in characters.
pub const CONTENT_MIN_LEN: usize = 20;

/// Maximum content length in characters.
pub const CONTENT_MAX_LEN: usize = 300;

/// Maximum address length in characters.
pub const ADDRESS_MAX_LEN: usize = 255;
