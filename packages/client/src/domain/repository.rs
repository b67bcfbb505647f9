//! Repository trait for the room backend.
//!
//! The domain layer defines what it needs from the backend; the
//! infrastructure layer provides the HTTP implementation (dependency inversion).

use async_trait::async_trait;

use super::{
    entity::GameRecord,
    error::RepositoryError,
    value_object::{RoomId, UserId},
    vote::VoteResults,
};

/// Full state of a room at the time it was entered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomSnapshot {
    pub games: Vec<GameRecord>,
    pub vote_results: VoteResults,
}

/// Result of asking the backend for a catalog user's collection
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionFetch {
    /// The catalog service queued the request; ask again later
    Processing,
    /// The catalog has no such user
    NotFound,
    Games(Vec<GameRecord>),
}

/// A user's complete vote and veto lists, sent as a full replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteSubmission {
    pub user: UserId,
    pub votes: Vec<String>,
    pub vetoes: Vec<String>,
}

/// Access to the room backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Create a new room and return its id
    async fn create_room(&self) -> Result<RoomId, RepositoryError>;

    /// Fetch the room's games and aggregate vote results
    async fn fetch_snapshot(&self, room_id: &RoomId) -> Result<RoomSnapshot, RepositoryError>;

    /// Look up a catalog user's collection without adding it
    async fn fetch_collection(
        &self,
        room_id: &RoomId,
        catalog_user: &str,
    ) -> Result<CollectionFetch, RepositoryError>;

    /// Add the selected games of a catalog user's collection to the room
    async fn add_collection(
        &self,
        room_id: &RoomId,
        catalog_user: &str,
        games: &[GameRecord],
    ) -> Result<Vec<GameRecord>, RepositoryError>;

    /// Add a single catalog game to the room
    async fn add_game(
        &self,
        room_id: &RoomId,
        user: &UserId,
        game_id: &str,
    ) -> Result<GameRecord, RepositoryError>;

    /// Persist a user's full vote and veto lists
    async fn submit_votes(
        &self,
        room_id: &RoomId,
        submission: &VoteSubmission,
    ) -> Result<(), RepositoryError>;

    /// Clear every user's votes and vetoes in the room
    async fn reset_votes(&self, room_id: &RoomId) -> Result<(), RepositoryError>;
}
