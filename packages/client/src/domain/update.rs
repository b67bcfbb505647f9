//! Incremental room updates delivered by the push channel.

use super::{entity::GameRecord, value_object::UserId};

/// A single update pushed by the backend after the room snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomUpdate {
    /// New games were added to the room, optionally attributed to the
    /// catalog user whose collection they came from.
    GamesAdded {
        user: Option<String>,
        games: Vec<GameRecord>,
    },
    /// A user's complete current vote and veto lists (full-state replacement).
    UserVoted {
        user: UserId,
        votes: Vec<String>,
        vetoes: Vec<String>,
    },
    /// All vote/veto state in the room was cleared.
    VotesReset,
}

impl RoomUpdate {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RoomUpdate::GamesAdded { .. } => "games-added",
            RoomUpdate::UserVoted { .. } => "user-voted",
            RoomUpdate::VotesReset => "votes-reset",
        }
    }
}

/// One step of a streamed collection import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportProgress {
    /// Fraction of the collection processed so far, in `0.0..=1.0`
    pub progress: f32,
    /// Most recently processed game
    pub game: Option<GameRecord>,
    /// Whether `game` was new to the room
    pub new_game: bool,
    pub error: Option<String>,
}

impl ImportProgress {
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}
