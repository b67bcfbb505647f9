//! UseCase 層
//!
//! ルーム画面の操作を実装するレイヤー。
//! UI 層から呼び出され、Domain 層と Repository を操作します。

pub mod add_game;
pub mod cast_vote;
pub mod enter_room;
pub mod error;
pub mod import_collection;
pub mod reset_votes;
pub mod session;

pub use add_game::AddGameUseCase;
pub use cast_vote::CastVoteUseCase;
pub use enter_room::EnterRoomUseCase;
pub use error::{EnterRoomError, ImportError, SessionError};
pub use import_collection::{ImportCollectionUseCase, ImportPreview, ImportTracker};
pub use reset_votes::ResetVotesUseCase;
pub use session::{RoomSession, VoteAction};
