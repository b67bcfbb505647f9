//! UseCase: カタログユーザーのコレクション取り込み処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ImportCollectionUseCase::preview() / commit() / follow_progress()
//!
//! ### なぜこのテストが必要か
//! - カタログサービスが「処理中」を返す間の再試行が上限で止まることを保証
//! - 既にルームにあるゲームが候補から除外されることを確認
//! - ストリーミング取り込みの進捗が 1.0 で完了することを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：プレビュー → 選択したゲームの追加
//! - 異常系：存在しないユーザー、再試行上限超過、ストリームのエラー
//! - エッジケース：全てのゲームが既に追加済み

use std::{fmt::Display, sync::Arc};

use futures_util::{Stream, StreamExt};

use crate::{
    config::RetryPolicy,
    domain::{CollectionFetch, GameCollection, GameKey, GameRecord, ImportProgress, RoomRepository},
};

use super::{error::ImportError, session::RoomSession};

/// Outcome of looking up a catalog user's collection
#[derive(Debug, Clone, PartialEq)]
pub enum ImportPreview {
    /// Games not yet in the room, to choose from
    Games(Vec<GameRecord>),
    /// The user has games, but every one of them is already in the room
    AllPresent { total: usize },
}

/// コレクション取り込みのユースケース
pub struct ImportCollectionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    retry: RetryPolicy,
}

impl ImportCollectionUseCase {
    /// 新しい ImportCollectionUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, retry: RetryPolicy) -> Self {
        Self { repository, retry }
    }

    /// カタログユーザーのコレクションを取得し、ルームにないゲームを返す
    ///
    /// While the catalog service answers "processing", the request is repeated
    /// up to `retry.max_attempts` times with the policy's delay in between.
    ///
    /// # Errors
    ///
    /// - `ImportError::UserNotFound` if the catalog has no such user
    /// - `ImportError::Timeout` once the attempts are used up
    /// - `ImportError::Repository` for any backend failure
    pub async fn preview(
        &self,
        session: &RoomSession,
        catalog_user: &str,
    ) -> Result<ImportPreview, ImportError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;
        let games = loop {
            attempt += 1;
            match self
                .repository
                .fetch_collection(session.room_id(), catalog_user)
                .await?
            {
                CollectionFetch::Games(games) => break games,
                CollectionFetch::NotFound => {
                    return Err(ImportError::UserNotFound(catalog_user.to_string()));
                }
                CollectionFetch::Processing if attempt >= max_attempts => {
                    tracing::warn!(
                        "Collection of '{}' still processing after {} attempt(s), giving up",
                        catalog_user,
                        attempt
                    );
                    return Err(ImportError::Timeout {
                        user: catalog_user.to_string(),
                        attempts: attempt,
                    });
                }
                CollectionFetch::Processing => {
                    let delay = self.retry.delay_after(attempt);
                    tracing::info!(
                        "Collection of '{}' is being processed, retrying in {:?} ({}/{})",
                        catalog_user,
                        delay,
                        attempt,
                        max_attempts
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        };

        Ok(filter_new_games(session.collection(), games))
    }

    /// 選択したゲームをルームに追加
    ///
    /// # Returns
    ///
    /// Keys of the games that were new to the local collection
    pub async fn commit(
        &self,
        session: &mut RoomSession,
        catalog_user: &str,
        games: Vec<GameRecord>,
    ) -> Result<Vec<GameKey>, ImportError> {
        let stored = self
            .repository
            .add_collection(session.room_id(), catalog_user, &games)
            .await?;
        let added = session.add_games(stored);
        tracing::info!(
            "Imported {} game(s) from '{}' into room '{}'",
            added.len(),
            catalog_user,
            session.room_id()
        );
        Ok(added)
    }

    /// ストリーミング取り込みの進捗を最後まで追いかける
    ///
    /// # Errors
    ///
    /// - `ImportError::Remote` if the stream fails or reports an error
    /// - `ImportError::Incomplete` if it ends before progress reaches 1.0
    pub async fn follow_progress<S, E>(
        &self,
        session: &mut RoomSession,
        mut events: S,
    ) -> Result<Vec<GameKey>, ImportError>
    where
        S: Stream<Item = Result<ImportProgress, E>> + Unpin,
        E: Display,
    {
        let mut tracker = ImportTracker::default();
        while let Some(event) = events.next().await {
            let event = event.map_err(|e| ImportError::Remote(e.to_string()))?;
            if tracker.apply(session, event)? {
                break;
            }
        }
        tracker.finish()
    }
}

/// Drop games the room already has, by the same rule `add_games` dedups with
fn filter_new_games(collection: &GameCollection, games: Vec<GameRecord>) -> ImportPreview {
    let total = games.len();
    let new_games: Vec<GameRecord> = games
        .into_iter()
        .filter(|game| collection.find_record(game).is_none())
        .collect();

    if total > 0 && new_games.is_empty() {
        ImportPreview::AllPresent { total }
    } else {
        ImportPreview::Games(new_games)
    }
}

/// Accumulates the progress events of one streamed import
#[derive(Debug, Default)]
pub struct ImportTracker {
    progress: f32,
    added: Vec<GameKey>,
}

impl ImportTracker {
    /// Apply one event.
    ///
    /// # Returns
    ///
    /// `true` once the import is complete
    pub fn apply(
        &mut self,
        session: &mut RoomSession,
        event: ImportProgress,
    ) -> Result<bool, ImportError> {
        if let Some(error) = event.error {
            return Err(ImportError::Remote(error));
        }
        let complete = event.is_complete();
        self.progress = event.progress.clamp(0.0, 1.0);
        if event.new_game {
            if let Some(game) = event.game {
                self.added.extend(session.add_games(vec![game]));
            }
        }
        tracing::debug!("Import progress {:.0}%", self.progress * 100.0);
        Ok(complete)
    }

    pub fn finish(self) -> Result<Vec<GameKey>, ImportError> {
        if self.progress < 1.0 {
            return Err(ImportError::Incomplete(self.progress * 100.0));
        }
        Ok(self.added)
    }
}
