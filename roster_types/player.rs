use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Playing role of a cricketer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Batsman,
    Bowler,
    #[serde(rename = "All-Rounder")]
    AllRounder,
    #[serde(rename = "Wicket-Keeper")]
    WicketKeeper,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Batsman,
        Role::Bowler,
        Role::AllRounder,
        Role::WicketKeeper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Batsman => "Batsman",
            Role::Bowler => "Bowler",
            Role::AllRounder => "All-Rounder",
            Role::WicketKeeper => "Wicket-Keeper",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Case-insensitive, ignoring separators: "All-rounder", "all rounder"
    /// and "ALLROUNDER" all map to `AllRounder`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "batsman" | "batter" => Ok(Role::Batsman),
            "bowler" => Ok(Role::Bowler),
            "allrounder" => Ok(Role::AllRounder),
            "wicketkeeper" | "keeper" => Ok(Role::WicketKeeper),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Reference to a profile image held by the image store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub filename: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub team: String,
    pub country: String,
    pub runs: i64,
    pub salary: f64,
    pub role: Role,
    pub image: Option<ImageRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: Uuid, fields: PlayerFields, image: Option<ImageRef>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: fields.name,
            team: normalize_team(&fields.team),
            country: fields.country,
            runs: fields.runs,
            salary: fields.salary,
            role: fields.role,
            image,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The scalar, user-editable part of a player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFields {
    pub name: String,
    pub team: String,
    pub country: String,
    pub runs: i64,
    pub salary: f64,
    pub role: Role,
}

/// A partial update: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerChanges {
    pub name: Option<String>,
    pub team: Option<String>,
    pub country: Option<String>,
    pub runs: Option<i64>,
    pub salary: Option<f64>,
    pub role: Option<Role>,
    pub image: Option<ImageRef>,
}

impl PlayerChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.team.is_none()
            && self.country.is_none()
            && self.runs.is_none()
            && self.salary.is_none()
            && self.role.is_none()
            && self.image.is_none()
    }

    pub fn apply_to(&self, player: &mut Player, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            player.name = name.clone();
        }
        if let Some(team) = &self.team {
            player.team = normalize_team(team);
        }
        if let Some(country) = &self.country {
            player.country = country.clone();
        }
        if let Some(runs) = self.runs {
            player.runs = runs;
        }
        if let Some(salary) = self.salary {
            player.salary = salary;
        }
        if let Some(role) = self.role {
            player.role = role;
        }
        if let Some(image) = &self.image {
            player.image = Some(image.clone());
        }
        player.updated_at = now;
    }
}

impl From<PlayerFields> for PlayerChanges {
    fn from(fields: PlayerFields) -> Self {
        Self {
            name: Some(fields.name),
            team: Some(fields.team),
            country: Some(fields.country),
            runs: Some(fields.runs),
            salary: Some(fields.salary),
            role: Some(fields.role),
            image: None,
        }
    }
}

/// Teams are stored trimmed and uppercase ("rcb " -> "RCB").
pub fn normalize_team(team: &str) -> String {
    team.trim().to_uppercase()
}
