//! UseCase: ルーム画面の状態管理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RoomSession のスナップショット取り込み、プッシュ更新の適用、投票操作
//!
//! ### なぜこのテストが必要か
//! - スナップショットと差分更新が同じ GameCollection に正しく統合されることを保証
//! - 楽観的更新が送信失敗時にロールバックされないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：スナップショット → 投票 → 他ユーザーの更新 → リセット
//! - 異常系：存在しないゲームへの投票、送信失敗
//! - エッジケース：自分自身の投票更新がプッシュで届く場合

use bgchooser_shared::time::get_jst_timestamp;

use crate::domain::{
    GameCollection, GameKey, GameRecord, RepositoryError, RoomId, RoomSnapshot, RoomUpdate,
    Standing, UserId, VoteSubmission,
};

use super::error::SessionError;

/// Which button the acting user clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Vote,
    Veto,
}

/// State of one room view for the acting user.
///
/// All mutation happens on the room event loop, one event at a time, so the
/// session is owned by that loop and never shared.
#[derive(Debug)]
pub struct RoomSession {
    room_id: RoomId,
    user: UserId,
    collection: GameCollection,
    /// Vote submissions that have not settled yet
    pending_saves: usize,
    vote_error: Option<String>,
    fatal_error: Option<String>,
    /// Unix timestamp (milliseconds) of the last snapshot or push update
    last_synced_at: Option<i64>,
}

impl RoomSession {
    pub fn new(room_id: RoomId, user: UserId) -> Self {
        Self {
            room_id,
            user,
            collection: GameCollection::new(),
            pending_saves: 0,
            vote_error: None,
            fatal_error: None,
            last_synced_at: None,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn collection(&self) -> &GameCollection {
        &self.collection
    }

    /// Load the room snapshot taken at room entry.
    ///
    /// Games are added first, then every user's vote lists are applied, which
    /// also seeds the acting user's own standings.
    ///
    /// # Returns
    ///
    /// Number of games added
    pub fn hydrate(&mut self, snapshot: RoomSnapshot) -> usize {
        let added = self.collection.add_games(snapshot.games);
        self.collection.hydrate(&snapshot.vote_results);
        self.last_synced_at = Some(get_jst_timestamp());
        added.len()
    }

    /// Replay one update from the push channel
    pub fn apply_update(&mut self, update: RoomUpdate) {
        tracing::debug!("Applying {} update to room '{}'", update.kind(), self.room_id);
        match update {
            RoomUpdate::GamesAdded { user, games } => {
                let added = self.collection.add_games(games);
                tracing::info!(
                    "{} new game(s) added to room '{}' (from {})",
                    added.len(),
                    self.room_id,
                    user.as_deref().unwrap_or("unknown")
                );
            }
            RoomUpdate::UserVoted {
                user,
                votes,
                vetoes,
            } => {
                self.collection.handle_user(&user, &votes, &vetoes);
            }
            RoomUpdate::VotesReset => {
                self.collection.reset_votes();
            }
        }
        self.last_synced_at = Some(get_jst_timestamp());
    }

    /// Merge games returned by an import or write-in
    pub fn add_games(&mut self, games: Vec<GameRecord>) -> Vec<GameKey> {
        self.collection.add_games(games)
    }

    /// Optimistically apply a click of the acting user.
    ///
    /// # Returns
    ///
    /// The acting user's complete lists to persist
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownGame` if no game matches `key`
    pub fn toggle(
        &mut self,
        action: VoteAction,
        key: &str,
    ) -> Result<(Standing, VoteSubmission), SessionError> {
        let game = self
            .collection
            .find_mut(key)
            .ok_or_else(|| SessionError::UnknownGame(key.to_string()))?;

        let standing = match action {
            VoteAction::Vote => game.toggle_vote(&self.user),
            VoteAction::Veto => game.toggle_veto(&self.user),
        };
        Ok((standing, self.submission()))
    }

    /// Keys of the games the acting user votes for
    pub fn my_votes(&self) -> Vec<String> {
        self.collection
            .games()
            .filter(|game| game.votes().contains(&self.user))
            .map(|game| game.key().as_str().to_string())
            .collect()
    }

    /// Keys of the games the acting user vetoes
    pub fn my_vetoes(&self) -> Vec<String> {
        self.collection
            .games()
            .filter(|game| game.vetoes().contains(&self.user))
            .map(|game| game.key().as_str().to_string())
            .collect()
    }

    /// The acting user's full current lists
    pub fn submission(&self) -> VoteSubmission {
        VoteSubmission {
            user: self.user.clone(),
            votes: self.my_votes(),
            vetoes: self.my_vetoes(),
        }
    }

    /// Mark a vote submission as in flight
    pub fn begin_save(&mut self) {
        self.pending_saves += 1;
        self.vote_error = None;
    }

    /// Settle a vote submission.
    ///
    /// A failure only sets the error flag; the optimistic local state stays
    /// until the next push update for this user reconciles it.
    pub fn finish_save(&mut self, result: Result<(), RepositoryError>) {
        self.pending_saves = self.pending_saves.saturating_sub(1);
        if let Err(e) = result {
            tracing::warn!("Failed to save votes in room '{}': {}", self.room_id, e);
            self.vote_error = Some(e.to_string());
        }
    }

    pub fn is_saving(&self) -> bool {
        self.pending_saves > 0
    }

    pub fn vote_error(&self) -> Option<&str> {
        self.vote_error.as_deref()
    }

    /// Record an unrecoverable failure (the push channel is gone)
    pub fn mark_fatal(&mut self, message: impl Into<String>) {
        self.fatal_error = Some(message.into());
    }

    pub fn fatal_error(&self) -> Option<&str> {
        self.fatal_error.as_deref()
    }

    pub fn last_synced_at(&self) -> Option<i64> {
        self.last_synced_at
    }
}
