//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RepositoryError;

/// Errors of local room session operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No game in the room matches the given key
    #[error("No game '{0}' in this room")]
    UnknownGame(String),
}

/// Errors while entering a room (snapshot fetch)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnterRoomError {
    #[error("Failed to create a room: {0}")]
    CreateRoom(RepositoryError),

    #[error("Failed to load room '{room_id}': {source}")]
    Snapshot {
        room_id: String,
        source: RepositoryError,
    },
}

/// Errors of collection imports and write-ins
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImportError {
    /// The catalog does not know the user
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The catalog was still processing after the last allowed attempt
    #[error("Collection of '{user}' was still being processed after {attempts} attempt(s)")]
    Timeout { user: String, attempts: u32 },

    /// The import stream reported an error
    #[error("Import failed: {0}")]
    Remote(String),

    /// The import stream ended before reaching full progress
    #[error("Import stream ended early at {0:.0}%")]
    Incomplete(f32),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
