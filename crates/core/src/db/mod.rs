//! SQLite storage bootstrap and schema migrations.
//!
//! Connections returned from here have pragmas applied and every known migration run, so the
//! repositories can assume the `note` table exists in its latest form.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_location, ping};
