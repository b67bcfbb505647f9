//! Domain layer for the BG Chooser client.
//!
//! This module contains the game/vote reconciliation model, independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod repository;
pub mod update;
pub mod value_object;
pub mod vote;

pub use entity::{Game, GameCollection, GameInfo, GameRecord, Standing};
pub use error::{RepositoryError, ValueObjectError};
pub use repository::{CollectionFetch, RoomRepository, RoomSnapshot, VoteSubmission};
#[cfg(test)]
pub use repository::MockRoomRepository;
pub use update::{ImportProgress, RoomUpdate};
pub use value_object::{GameKey, RoomId, UserId};
pub use vote::VoteResults;
