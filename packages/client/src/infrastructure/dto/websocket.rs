//! WebSocket message DTOs for the push channel and import progress.

use serde::{Deserialize, Serialize};

use super::http::GameDto;
use crate::{
    domain::{GameRecord, ImportProgress, RoomUpdate, UserId},
    infrastructure::error::ChannelError,
};

/// Update type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateType {
    #[serde(rename = "addedGamesUpdate")]
    AddedGames,
    #[serde(rename = "addedVotesUpdate")]
    AddedVotes,
    #[serde(rename = "resetVotesUpdate")]
    ResetVotes,
}

/// Message pushed by the backend for a room subscription.
///
/// The backend marshals this without field tags, so capitalized names are
/// accepted as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionMessage {
    #[serde(alias = "Type")]
    pub r#type: UpdateType,
    #[serde(default, alias = "User")]
    pub user: Option<String>,
    #[serde(default, alias = "Games")]
    pub games: Option<Vec<GameDto>>,
    #[serde(default, alias = "Votes")]
    pub votes: Option<Vec<String>>,
    #[serde(default, alias = "Vetoes")]
    pub vetoes: Option<Vec<String>>,
}

/// Progress event of a streamed collection import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddGamesMessage {
    pub progress: f32,
    #[serde(default)]
    pub game: Option<GameDto>,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub new_game: bool,
}

/// First frame a client sends on the push channel
pub fn register_message(room_id: &str) -> String {
    format!("register:{room_id}")
}

fn into_records(games: Option<Vec<GameDto>>) -> Vec<GameRecord> {
    games
        .unwrap_or_default()
        .into_iter()
        .map(GameRecord::from)
        .collect()
}

impl TryFrom<SubscriptionMessage> for RoomUpdate {
    type Error = ChannelError;

    fn try_from(msg: SubscriptionMessage) -> Result<Self, Self::Error> {
        match msg.r#type {
            UpdateType::AddedGames => Ok(RoomUpdate::GamesAdded {
                user: msg.user.filter(|user| !user.is_empty()),
                games: into_records(msg.games),
            }),
            UpdateType::AddedVotes => {
                let user = msg
                    .user
                    .ok_or_else(|| ChannelError::InvalidMessage("vote update without user".into()))
                    .and_then(|user| {
                        UserId::new(user).map_err(|e| ChannelError::InvalidMessage(e.to_string()))
                    })?;
                Ok(RoomUpdate::UserVoted {
                    user,
                    votes: msg.votes.unwrap_or_default(),
                    vetoes: msg.vetoes.unwrap_or_default(),
                })
            }
            UpdateType::ResetVotes => Ok(RoomUpdate::VotesReset),
        }
    }
}

impl From<AddGamesMessage> for ImportProgress {
    fn from(msg: AddGamesMessage) -> Self {
        Self {
            progress: msg.progress,
            game: msg.game.map(GameRecord::from),
            new_game: msg.new_game,
            error: if msg.error.is_empty() {
                None
            } else {
                Some(msg.error)
            },
        }
    }
}
