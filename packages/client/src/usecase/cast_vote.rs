//! UseCase: 投票・拒否の送信処理
//!
//! ローカルの楽観的更新は RoomSession が行い、このユースケースは
//! ユーザーの完全な投票・拒否リストをバックエンドに保存するだけを担当します。

use std::sync::Arc;

use crate::domain::{RepositoryError, RoomId, RoomRepository, VoteSubmission};

/// 投票送信のユースケース
#[derive(Clone)]
pub struct CastVoteUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl CastVoteUseCase {
    /// 新しい CastVoteUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 投票リストの保存を実行
    ///
    /// No retry, cancellation or timeout is applied; the caller only uses the
    /// result to settle its "saving" indicator.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        submission: &VoteSubmission,
    ) -> Result<(), RepositoryError> {
        tracing::debug!(
            "Saving {} vote(s) and {} veto(es) for '{}'",
            submission.votes.len(),
            submission.vetoes.len(),
            submission.user
        );
        self.repository.submit_votes(room_id, submission).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockRoomRepository, UserId};

    #[tokio::test]
    async fn test_submits_full_lists() {
        // テスト項目: 完全な投票・拒否リストがそのまま送信される
        // given (前提条件):
        let mut repository = MockRoomRepository::new();
        repository
            .expect_submit_votes()
            .withf(|room_id, submission| {
                room_id.as_str() == "04217"
                    && submission.votes == vec!["1".to_string()]
                    && submission.vetoes == vec!["2".to_string()]
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = CastVoteUseCase::new(Arc::new(repository));
        let submission = VoteSubmission {
            user: UserId::new("u1".to_string()).unwrap(),
            votes: vec!["1".to_string()],
            vetoes: vec!["2".to_string()],
        };

        // when (操作):
        let result = usecase
            .execute(&RoomId::new("04217".to_string()).unwrap(), &submission)
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
