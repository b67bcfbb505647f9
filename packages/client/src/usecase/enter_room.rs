//! UseCase: ルーム入室処理
//!
//! ルーム ID がなければ新しいルームを作成し、スナップショットを取得して
//! RoomSession を構築します。

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository, UserId};

use super::{error::EnterRoomError, session::RoomSession};

/// ルーム入室のユースケース
pub struct EnterRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl EnterRoomUseCase {
    /// 新しい EnterRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 新しいルームを作成
    pub async fn create_room(&self) -> Result<RoomId, EnterRoomError> {
        let room_id = self
            .repository
            .create_room()
            .await
            .map_err(EnterRoomError::CreateRoom)?;
        tracing::info!("Created room '{}'", room_id);
        Ok(room_id)
    }

    /// 入室を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 入室するルーム（`None` なら新規作成）
    /// * `user` - 操作するユーザー
    ///
    /// # Returns
    ///
    /// * `Ok(RoomSession)` - スナップショットを取り込んだセッション
    /// * `Err(EnterRoomError)` - 作成または取得に失敗
    pub async fn execute(
        &self,
        room_id: Option<RoomId>,
        user: UserId,
    ) -> Result<RoomSession, EnterRoomError> {
        let room_id = match room_id {
            Some(room_id) => room_id,
            None => self.create_room().await?,
        };

        let snapshot = self
            .repository
            .fetch_snapshot(&room_id)
            .await
            .map_err(|source| EnterRoomError::Snapshot {
                room_id: room_id.to_string(),
                source,
            })?;

        let mut session = RoomSession::new(room_id, user);
        let games = session.hydrate(snapshot);
        tracing::info!(
            "Entered room '{}' as '{}' with {} game(s)",
            session.room_id(),
            session.user(),
            games
        );
        Ok(session)
    }
}
