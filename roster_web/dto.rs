use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roster_app::{config::Config, repository::PlayerPage};
use roster_types::player::{Player, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub id: Uuid,
    pub name: String,
    pub team: String,
    pub country: String,
    pub runs: i64,
    pub salary: f64,
    pub role: Role,
    /// Absolute URL of the thumbnail, if any.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerResponse {
    pub fn new(player: Player, config: &Config) -> Self {
        Self {
            id: player.id,
            image: player.image.map(|i| config.image_url(&i.filename)),
            name: player.name,
            team: player.team,
            country: player.country,
            runs: player.runs,
            salary: player.salary,
            role: player.role,
            created_at: player.created_at,
            updated_at: player.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerListResponse {
    pub players: Vec<PlayerResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl PlayerListResponse {
    pub fn new(page: PlayerPage, number: i64, limit: i64, config: &Config) -> Self {
        Self {
            players: page
                .players
                .into_iter()
                .map(|p| PlayerResponse::new(p, config))
                .collect(),
            total: page.total,
            page: number,
            limit,
        }
    }
}

/// Public profile of a player: no id, no timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDescription {
    pub name: String,
    pub team: String,
    pub country: String,
    pub runs: i64,
    pub image: Option<String>,
    pub role: Role,
    pub salary: f64,
}

impl PlayerDescription {
    pub fn new(player: Player, config: &Config) -> Self {
        Self {
            image: player.image.map(|i| config.image_url(&i.filename)),
            name: player.name,
            team: player.team,
            country: player.country,
            runs: player.runs,
            role: player.role,
            salary: player.salary,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
