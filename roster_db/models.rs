use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(sqlx::Type, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "player_role")]
pub enum Role {
    Batsman,
    Bowler,
    #[sqlx(rename = "All-Rounder")]
    AllRounder,
    #[sqlx(rename = "Wicket-Keeper")]
    WicketKeeper,
}

#[derive(Debug, FromRow, Clone)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub team: String,
    pub country: String,
    pub runs: i64,
    pub salary: f64,
    pub role: Role,
    pub image_filename: Option<String>,
    pub image_content_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column list matching [`Player`], for SELECT and RETURNING clauses.
pub const PLAYER_COLUMNS: &str = "id, name, team, country, runs, salary, role, \
     image_filename, image_content_type, created_at, updated_at";
