//! HTTP API DTOs for the BG Chooser backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{GameInfo, GameRecord, UserId, VoteResults};

/// Player-count and playtime ranges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfoDto {
    #[serde(default)]
    pub min_players: u32,
    #[serde(default)]
    pub max_players: u32,
    #[serde(default)]
    pub min_playtime: u32,
    #[serde(default)]
    pub max_playtime: u32,
}

/// Game record as exchanged with the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDto {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub info: GameInfoDto,
    #[serde(default, alias = "categories", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Some backend revisions echo vote state on game records; it is never imported
    #[serde(default, skip_serializing)]
    pub votes: Option<Vec<String>>,
    #[serde(default, skip_serializing)]
    pub vetoes: Option<Vec<String>>,
}

impl From<GameDto> for GameRecord {
    fn from(dto: GameDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            thumbnail: dto.thumbnail,
            info: GameInfo {
                min_players: dto.info.min_players,
                max_players: dto.info.max_players,
                min_playtime: dto.info.min_playtime,
                max_playtime: dto.info.max_playtime,
            },
            tags: dto.tags.unwrap_or_default(),
        }
    }
}

impl From<&GameRecord> for GameDto {
    fn from(record: &GameRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            thumbnail: record.thumbnail.clone(),
            info: GameInfoDto {
                min_players: record.info.min_players,
                max_players: record.info.max_players,
                min_playtime: record.info.min_playtime,
                max_playtime: record.info.max_playtime,
            },
            tags: if record.tags.is_empty() {
                None
            } else {
                Some(record.tags.clone())
            },
            votes: None,
            vetoes: None,
        }
    }
}

/// Map from user to game keys; the backend may send `null` for either level
pub type VoteObjDto = BTreeMap<String, Option<Vec<String>>>;

/// Aggregate vote results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteResultsDto {
    #[serde(default)]
    pub votes: Option<VoteObjDto>,
    #[serde(default)]
    pub vetoes: Option<VoteObjDto>,
}

fn vote_obj_into_domain(obj: Option<VoteObjDto>) -> BTreeMap<UserId, Vec<String>> {
    obj.unwrap_or_default()
        .into_iter()
        .filter_map(|(user, keys)| match UserId::new(user) {
            Ok(user) => Some((user, keys.unwrap_or_default())),
            Err(e) => {
                tracing::warn!("Ignoring vote results for invalid user: {}", e);
                None
            }
        })
        .collect()
}

impl From<VoteResultsDto> for VoteResults {
    fn from(dto: VoteResultsDto) -> Self {
        Self {
            votes: vote_obj_into_domain(dto.votes),
            vetoes: vote_obj_into_domain(dto.vetoes),
        }
    }
}

/// Response of `GET /api/rooms/{room}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfoDto {
    #[serde(default)]
    pub games: Option<Vec<GameDto>>,
    #[serde(default)]
    pub vote_results: VoteResultsDto,
}

/// Response of `POST /api/rooms`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoomDto {
    #[serde(rename = "roomID")]
    pub room_id: String,
}

/// Request and response body of the catalog collection endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogUserGamesDto {
    pub games: Option<Vec<GameDto>>,
}

/// Response of the single-game write-in endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddGameDto {
    pub game: GameDto,
}

/// Request body of `POST /api/rooms/{room}/vote/{user}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotesBodyDto {
    pub votes: Vec<String>,
    pub vetoes: Vec<String>,
}
