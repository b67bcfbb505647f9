//! UseCase: 投票リセット処理

use std::sync::Arc;

use crate::domain::{RepositoryError, RoomRepository, RoomUpdate};

use super::session::RoomSession;

/// ルーム全体の投票リセットのユースケース
pub struct ResetVotesUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl ResetVotesUseCase {
    /// 新しい ResetVotesUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// リセットを実行
    ///
    /// Local state is cleared only after the backend accepted the reset; the
    /// `resetVotesUpdate` push that follows is idempotent with it.
    pub async fn execute(&self, session: &mut RoomSession) -> Result<(), RepositoryError> {
        self.repository.reset_votes(session.room_id()).await?;
        session.apply_update(RoomUpdate::VotesReset);
        tracing::info!("Reset all votes in room '{}'", session.room_id());
        Ok(())
    }
}
