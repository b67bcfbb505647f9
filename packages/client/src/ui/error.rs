//! Top-level errors of the terminal client.

use thiserror::Error;

use crate::{infrastructure::ChannelError, usecase::EnterRoomError};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The room snapshot could not be loaded
    #[error(transparent)]
    EnterRoom(#[from] EnterRoomError),

    /// The push channel could not be opened
    #[error("Failed to subscribe to room updates: {0}")]
    Subscribe(#[from] ChannelError),

    /// The push channel failed after the room was entered
    #[error("Connection to the room was lost: {0}")]
    Disconnected(ChannelError),

    #[error("Line editor failed: {0}")]
    Editor(String),
}
