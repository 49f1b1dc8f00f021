use crate::note::NoteId;

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("note not found: {0}")]
    NotFound(NoteId),
    #[error("invalid note: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("invalid note id: {0}")]
    InvalidId(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error(
        "database schema version {db_version} is newer than supported {latest_supported}"
    )]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    #[error("database connection lock was poisoned")]
    StoragePoisoned,
    #[error("stored note is corrupt: {0}")]
    Corrupt(String),
    #[error("serialisation error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NoteError {
    /// Convenience constructor for a single validation failure.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// `true` for errors caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Validation(_) | Self::InvalidId(_)
        )
    }
}

pub type NoteResult<T> = std::result::Result<T, NoteError>;
