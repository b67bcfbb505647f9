//! UseCase: 単体ゲームの追加処理（カタログ ID 指定）

use std::sync::Arc;

use crate::domain::{GameKey, RoomRepository};

use super::{error::ImportError, session::RoomSession};

/// 単体ゲーム追加のユースケース
pub struct AddGameUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl AddGameUseCase {
    /// 新しい AddGameUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ゲーム追加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(key))` - 新しく追加されたゲームのキー
    /// * `Ok(None)` - 既にルームにあったゲーム
    pub async fn execute(
        &self,
        session: &mut RoomSession,
        game_id: &str,
    ) -> Result<Option<GameKey>, ImportError> {
        let game = self
            .repository
            .add_game(session.room_id(), session.user(), game_id)
            .await?;
        let name = game.name.clone();
        let added = session.add_games(vec![game]).into_iter().next();
        match &added {
            Some(key) => tracing::info!("Added '{}' ({}) to room '{}'", name, key, session.room_id()),
            None => tracing::info!("'{}' is already in room '{}'", name, session.room_id()),
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GameRecord, MockRoomRepository, RepositoryError, RoomId, UserId};

    fn create_session() -> RoomSession {
        RoomSession::new(
            RoomId::new("04217".to_string()).unwrap(),
            UserId::new("u1".to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_add_game_merges_into_collection() {
        // テスト項目: 追加したゲームがコレクションに入り、二度目は None になる
        // given (前提条件):
        let mut repository = MockRoomRepository::new();
        repository
            .expect_add_game()
            .withf(|_, user, game_id| user.as_str() == "u1" && game_id == "13")
            .times(2)
            .returning(|_, _, _| {
                Ok(GameRecord {
                    id: "13".to_string(),
                    name: "Catan".to_string(),
                    ..Default::default()
                })
            });
        let usecase = AddGameUseCase::new(Arc::new(repository));
        let mut session = create_session();

        // when (操作):
        let first = usecase.execute(&mut session, "13").await.unwrap();
        let second = usecase.execute(&mut session, "13").await.unwrap();

        // then (期待する結果):
        assert_eq!(first.unwrap().as_str(), "13");
        assert!(second.is_none());
        assert_eq!(session.collection().len(), 1);
    }

    #[tokio::test]
    async fn test_add_game_failure() {
        // テスト項目: バックエンドのエラーは ImportError::Repository になる
        let mut repository = MockRoomRepository::new();
        repository.expect_add_game().returning(|_, _, _| {
            Err(RepositoryError::UnexpectedStatus {
                status: 500,
                body: "bgg unavailable".to_string(),
            })
        });
        let usecase = AddGameUseCase::new(Arc::new(repository));
        let mut session = create_session();

        let result = usecase.execute(&mut session, "13").await;

        assert!(matches!(result, Err(ImportError::Repository(_))));
        assert!(!session.collection().has_games());
    }
}
