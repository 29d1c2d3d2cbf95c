use uuid::Uuid;

use roster_types::errors::ApplicationError;
use roster_types::player::{Player, PlayerChanges};

/// Field a player listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    Team,
    Country,
    Runs,
    Salary,
    Role,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::Name,
        SortField::Team,
        SortField::Country,
        SortField::Runs,
        SortField::Salary,
        SortField::Role,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];

    /// Name used in query strings and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Team => "team",
            SortField::Country => "country",
            SortField::Runs => "runs",
            SortField::Salary => "salary",
            SortField::Role => "role",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Filter, sort and page of a player listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerListQuery {
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
    /// Exact team, already uppercased.
    pub team: Option<String>,
    pub sort_by: SortField,
    pub order: SortOrder,
    /// 1-indexed.
    pub page: i64,
    pub limit: i64,
}

impl PlayerListQuery {
    pub const DEFAULT_LIMIT: i64 = 6;
    pub const MAX_LIMIT: i64 = 100;
    /// Highest page whose offset fits in an `i64` at the largest limit.
    pub const MAX_PAGE: i64 = i64::MAX / Self::MAX_LIMIT;

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit.max(0))
    }
}

impl Default for PlayerListQuery {
    fn default() -> Self {
        Self {
            search: None,
            team: None,
            sort_by: SortField::default(),
            order: SortOrder::default(),
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPage {
    pub players: Vec<Player>,
    /// Number of players matching the filter, across all pages.
    pub total: i64,
}

#[async_trait::async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Inserts a new player and returns the stored record.
    async fn create(&self, player: &Player) -> Result<Player, ApplicationError>;

    /// Returns one page of players matching the query, plus the total count.
    async fn list(&self, query: &PlayerListQuery) -> Result<PlayerPage, ApplicationError>;

    async fn get_by_id(&self, player_id: Uuid) -> Result<Option<Player>, ApplicationError>;

    /// Applies only the supplied fields and bumps `updated_at`.
    /// Returns `None` when no player has this id.
    async fn update(
        &self,
        player_id: Uuid,
        changes: &PlayerChanges,
    ) -> Result<Option<Player>, ApplicationError>;

    /// Returns whether a player existed and was removed.
    async fn delete(&self, player_id: Uuid) -> Result<bool, ApplicationError>;
}
