//! HTTP Room Repository 実装
//!
//! バックエンドの REST API（`/api/rooms/...`）を `reqwest` で呼び出す
//! RoomRepository trait の実装。

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use crate::{
    domain::{
        CollectionFetch, GameRecord, RepositoryError, RoomId, RoomRepository, RoomSnapshot, UserId,
        VoteSubmission,
    },
    infrastructure::dto::http::{
        AddGameDto, CatalogUserGamesDto, GameDto, NewRoomDto, RoomInfoDto, VotesBodyDto,
    },
};

/// HTTP client for the BG Chooser backend
#[derive(Debug, Clone)]
pub struct HttpRoomRepository {
    base_url: String,
    client: Client,
}

impl HttpRoomRepository {
    /// Create a repository for the backend at `base_url` (e.g. `http://localhost:8000`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    fn room_url(&self, room_id: &RoomId) -> String {
        format!("{}/api/rooms/{}", self.base_url, encode_segment(room_id.as_str()))
    }

    fn catalog_user_url(&self, room_id: &RoomId, catalog_user: &str) -> String {
        format!(
            "{}/bgguser/{}",
            self.room_url(room_id),
            encode_segment(catalog_user)
        )
    }
}

/// Percent-encode a single path segment
fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Turn a non-success response into `RepositoryError::UnexpectedStatus` with its body text
async fn ensure_success(response: Response) -> Result<Response, RepositoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RepositoryError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

fn into_records(games: Vec<GameDto>) -> Vec<GameRecord> {
    games.into_iter().map(GameRecord::from).collect()
}

#[async_trait]
impl RoomRepository for HttpRoomRepository {
    async fn create_room(&self) -> Result<RoomId, RepositoryError> {
        let response = self
            .client
            .post(format!("{}/api/rooms", self.base_url))
            .send()
            .await?;
        let dto: NewRoomDto = ensure_success(response).await?.json().await?;
        RoomId::new(dto.room_id).map_err(|e| RepositoryError::Decode(e.to_string()))
    }

    async fn fetch_snapshot(&self, room_id: &RoomId) -> Result<RoomSnapshot, RepositoryError> {
        let response = self.client.get(self.room_url(room_id)).send().await?;
        let dto: RoomInfoDto = ensure_success(response).await?.json().await?;
        Ok(RoomSnapshot {
            games: into_records(dto.games.unwrap_or_default()),
            vote_results: dto.vote_results.into(),
        })
    }

    async fn fetch_collection(
        &self,
        room_id: &RoomId,
        catalog_user: &str,
    ) -> Result<CollectionFetch, RepositoryError> {
        let response = self
            .client
            .get(self.catalog_user_url(room_id, catalog_user))
            .send()
            .await?;
        if response.status() == StatusCode::ACCEPTED {
            return Ok(CollectionFetch::Processing);
        }
        let dto: CatalogUserGamesDto = ensure_success(response).await?.json().await?;
        Ok(match dto.games {
            Some(games) => CollectionFetch::Games(into_records(games)),
            None => CollectionFetch::NotFound,
        })
    }

    async fn add_collection(
        &self,
        room_id: &RoomId,
        catalog_user: &str,
        games: &[GameRecord],
    ) -> Result<Vec<GameRecord>, RepositoryError> {
        let body = CatalogUserGamesDto {
            games: Some(games.iter().map(GameDto::from).collect()),
        };
        let response = self
            .client
            .post(self.catalog_user_url(room_id, catalog_user))
            .json(&body)
            .send()
            .await?;
        let dto: CatalogUserGamesDto = ensure_success(response).await?.json().await?;
        Ok(into_records(dto.games.unwrap_or_default()))
    }

    async fn add_game(
        &self,
        room_id: &RoomId,
        user: &UserId,
        game_id: &str,
    ) -> Result<GameRecord, RepositoryError> {
        let url = format!(
            "{}/games/{}/{}",
            self.room_url(room_id),
            encode_segment(user.as_str()),
            encode_segment(game_id)
        );
        let response = self.client.post(url).send().await?;
        let dto: AddGameDto = ensure_success(response).await?.json().await?;
        Ok(dto.game.into())
    }

    async fn submit_votes(
        &self,
        room_id: &RoomId,
        submission: &VoteSubmission,
    ) -> Result<(), RepositoryError> {
        let url = format!(
            "{}/vote/{}",
            self.room_url(room_id),
            encode_segment(submission.user.as_str())
        );
        let body = VotesBodyDto {
            votes: submission.votes.clone(),
            vetoes: submission.vetoes.clone(),
        };
        let response = self.client.post(url).json(&body).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn reset_votes(&self, room_id: &RoomId) -> Result<(), RepositoryError> {
        let url = format!("{}/votes", self.room_url(room_id));
        let response = self.client.delete(url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_segment() {
        // テスト項目: パスセグメントの予約文字がエンコードされる
        assert_eq!(encode_segment("alice"), "alice");
        assert_eq!(encode_segment("tom & jerry"), "tom%20%26%20jerry");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
    }

    #[test]
    fn test_urls() {
        // テスト項目: 末尾のスラッシュを除いた URL が組み立てられる
        let repo = HttpRoomRepository::new("http://localhost:8000/");
        let room = RoomId::new("04217".to_string()).unwrap();
        assert_eq!(repo.room_url(&room), "http://localhost:8000/api/rooms/04217");
        assert_eq!(
            repo.catalog_user_url(&room, "some user"),
            "http://localhost:8000/api/rooms/04217/bgguser/some%20user"
        );
    }
}
