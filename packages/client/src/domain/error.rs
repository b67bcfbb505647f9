//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// GameKey validation error (neither id nor name present)
    #[error("GameKey cannot be empty")]
    GameKeyEmpty,

    /// GameKey too long error
    #[error("GameKey cannot exceed {max} characters (got {actual})")]
    GameKeyTooLong { max: usize, actual: usize },
}

/// Errors raised while talking to the backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The request could not be sent or the connection failed
    #[error("Request to backend failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("Backend returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body did not have the expected shape
    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}
