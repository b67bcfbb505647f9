//! Infrastructure layer error definitions.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::domain::RepositoryError;

/// Errors of the WebSocket channels (room push channel and import progress)
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("WebSocket connection failed: {0}")]
    Connect(Box<tungstenite::Error>),

    #[error("Failed to send on WebSocket: {0}")]
    Send(Box<tungstenite::Error>),

    #[error("Failed to receive from WebSocket: {0}")]
    Receive(Box<tungstenite::Error>),

    #[error("Malformed message: {0}")]
    InvalidMessage(String),

    #[error("WebSocket closed by server")]
    Closed,
}

impl From<reqwest::Error> for RepositoryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RepositoryError::Decode(e.to_string())
        } else {
            RepositoryError::Transport(e.to_string())
        }
    }
}
