use roster_app::repository::SortField;
use roster_types::player::{ImageRef, Player, Role};

use crate::models::{self as db_models};

impl From<db_models::Role> for Role {
    fn from(role: db_models::Role) -> Self {
        match role {
            db_models::Role::Batsman => Role::Batsman,
            db_models::Role::Bowler => Role::Bowler,
            db_models::Role::AllRounder => Role::AllRounder,
            db_models::Role::WicketKeeper => Role::WicketKeeper,
        }
    }
}

impl From<Role> for db_models::Role {
    fn from(role: Role) -> Self {
        match role {
            Role::Batsman => db_models::Role::Batsman,
            Role::Bowler => db_models::Role::Bowler,
            Role::AllRounder => db_models::Role::AllRounder,
            Role::WicketKeeper => db_models::Role::WicketKeeper,
        }
    }
}

impl From<db_models::Player> for Player {
    fn from(row: db_models::Player) -> Self {
        // A half-set image reference is treated as no image.
        let image = match (row.image_filename, row.image_content_type) {
            (Some(filename), Some(content_type)) => Some(ImageRef {
                filename,
                content_type,
            }),
            _ => None,
        };

        Player {
            id: row.id,
            name: row.name,
            team: row.team,
            country: row.country,
            runs: row.runs,
            salary: row.salary,
            role: row.role.into(),
            image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Column backing a sort field. Only these names ever reach ORDER BY.
pub fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Name => "name",
        SortField::Team => "team",
        SortField::Country => "country",
        SortField::Runs => "runs",
        SortField::Salary => "salary",
        SortField::Role => "role",
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
    }
}

/// Escapes LIKE wildcards so a search term only matches literally.
pub fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn row() -> db_models::Player {
        let now = Utc::now();
        db_models::Player {
            id: Uuid::new_v4(),
            name: "Rashid Khan".to_string(),
            team: "GT".to_string(),
            country: "Afghanistan".to_string(),
            runs: 400,
            salary: 150_000_000.0,
            role: db_models::Role::AllRounder,
            image_filename: Some("a.jpg".to_string()),
            image_content_type: Some("image/jpeg".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_to_player() {
        let player: Player = row().into();
        assert_eq!(player.role, Role::AllRounder);
        assert_eq!(player.image.unwrap().filename, "a.jpg");
    }

    #[test]
    fn test_partial_image_columns_mean_no_image() {
        let mut row = row();
        row.image_content_type = None;
        let player: Player = row.into();
        assert!(player.image.is_none());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("kohli"), "%kohli%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_every_sort_field_has_a_column() {
        for field in SortField::ALL {
            assert!(!sort_column(field).is_empty());
        }
        assert_eq!(sort_column(SortField::CreatedAt), "created_at");
    }
}
