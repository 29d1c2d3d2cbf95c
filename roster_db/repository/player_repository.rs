use chrono::Utc;
use sqlx::{Postgres, QueryBuilder, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use roster_app::repository::{PlayerListQuery, PlayerPage, PlayerRepository, SortOrder};
use roster_types::{
    errors::{ApplicationError, DbError},
    player::{Player, PlayerChanges, normalize_team},
};

use crate::{
    mapping::{like_pattern, sort_column},
    models::{self as db_models, PLAYER_COLUMNS},
};

/// Implements PlayerRepository and operates on transactions.
#[derive(Clone)]
pub struct PostgresPlayerRepository {
    tx: Arc<Mutex<Transaction<'static, Postgres>>>,
}

impl PostgresPlayerRepository {
    pub fn new(tx: Arc<Mutex<Transaction<'static, Postgres>>>) -> Self {
        Self { tx }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &PlayerListQuery) {
    let mut keyword = " WHERE ";

    if let Some(search) = &query.search {
        builder
            .push(keyword)
            .push("name ILIKE ")
            .push_bind(like_pattern(search));
        keyword = " AND ";
    }

    if let Some(team) = &query.team {
        builder
            .push(keyword)
            .push("team = ")
            .push_bind(normalize_team(team));
    }
}

#[async_trait::async_trait]
impl PlayerRepository for PostgresPlayerRepository {
    async fn create(&self, player: &Player) -> Result<Player, ApplicationError> {
        let role: db_models::Role = player.role.into();
        let image_filename = player.image.as_ref().map(|i| i.filename.as_str());
        let image_content_type = player.image.as_ref().map(|i| i.content_type.as_str());
        let mut tx_guard = self.tx.lock().await;

        let sql = format!(
            r#"
              INSERT INTO players
                (id, name, team, country, runs, salary, role,
                 image_filename, image_content_type, created_at, updated_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
              RETURNING {PLAYER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, db_models::Player>(&sql)
            .bind(player.id)
            .bind(&player.name)
            .bind(normalize_team(&player.team))
            .bind(&player.country)
            .bind(player.runs)
            .bind(player.salary)
            .bind(role)
            .bind(image_filename)
            .bind(image_content_type)
            .bind(player.created_at)
            .bind(player.updated_at)
            .fetch_one(&mut *tx_guard.as_mut())
            .await
            .map_err(DbError::from_sqlx)?;

        Ok(row.into())
    }

    async fn list(&self, query: &PlayerListQuery) -> Result<PlayerPage, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM players");
        push_filters(&mut count, query);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&mut *tx_guard.as_mut())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        let direction = match query.order {
            SortOrder::Asc => " ASC",
            SortOrder::Desc => " DESC",
        };

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {PLAYER_COLUMNS} FROM players"));
        push_filters(&mut select, query);
        select
            .push(" ORDER BY ")
            .push(sort_column(query.sort_by))
            .push(direction)
            .push(", id ASC LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset());

        let rows: Vec<db_models::Player> = select
            .build_query_as()
            .fetch_all(&mut *tx_guard.as_mut())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(PlayerPage {
            players: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    async fn get_by_id(&self, player_id: Uuid) -> Result<Option<Player>, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1");

        let row = sqlx::query_as::<_, db_models::Player>(&sql)
            .bind(player_id)
            .fetch_optional(&mut *tx_guard.as_mut())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(row.map(Into::into))
    }

    async fn update(
        &self,
        player_id: Uuid,
        changes: &PlayerChanges,
    ) -> Result<Option<Player>, ApplicationError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE players SET updated_at = ");
        builder.push_bind(Utc::now());

        if let Some(name) = &changes.name {
            builder.push(", name = ").push_bind(name.clone());
        }
        if let Some(team) = &changes.team {
            builder.push(", team = ").push_bind(normalize_team(team));
        }
        if let Some(country) = &changes.country {
            builder.push(", country = ").push_bind(country.clone());
        }
        if let Some(runs) = changes.runs {
            builder.push(", runs = ").push_bind(runs);
        }
        if let Some(salary) = changes.salary {
            builder.push(", salary = ").push_bind(salary);
        }
        if let Some(role) = changes.role {
            builder
                .push(", role = ")
                .push_bind(db_models::Role::from(role));
        }
        if let Some(image) = &changes.image {
            builder
                .push(", image_filename = ")
                .push_bind(image.filename.clone())
                .push(", image_content_type = ")
                .push_bind(image.content_type.clone());
        }

        builder
            .push(" WHERE id = ")
            .push_bind(player_id)
            .push(" RETURNING ")
            .push(PLAYER_COLUMNS);

        let mut tx_guard = self.tx.lock().await;
        let row: Option<db_models::Player> = builder
            .build_query_as()
            .fetch_optional(&mut *tx_guard.as_mut())
            .await
            .map_err(DbError::from_sqlx)?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, player_id: Uuid) -> Result<bool, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(player_id)
            .execute(&mut *tx_guard.as_mut())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{establish_test_connection_pool, run_migrations};
    use roster_app::repository::SortField;
    use roster_types::player::{ImageRef, PlayerFields, Role};

    async fn repository() -> PostgresPlayerRepository {
        let pool = establish_test_connection_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let tx = pool.begin().await.unwrap();
        PostgresPlayerRepository::new(Arc::new(Mutex::new(tx)))
    }

    fn player(name: &str, team: &str, runs: i64) -> Player {
        Player::new(
            Uuid::new_v4(),
            PlayerFields {
                name: name.to_string(),
                team: team.to_string(),
                country: "India".to_string(),
                runs,
                salary: 2_000_000.0,
                role: Role::WicketKeeper,
            },
            None,
        )
    }

    #[tokio::test]
    #[ignore = "needs TEST_DATABASE_URL"]
    async fn test_create_and_get_round_trip() {
        let repo = repository().await;
        let mut original = player("Rishabh Pant", "dc", 3000);
        original.image = Some(ImageRef {
            filename: "pant.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
        });

        repo.create(&original).await.unwrap();
        let found = repo.get_by_id(original.id).await.unwrap().unwrap();

        assert_eq!(found.name, "Rishabh Pant");
        assert_eq!(found.team, "DC");
        assert_eq!(found.role, Role::WicketKeeper);
        assert_eq!(found.image, original.image);
    }

    #[tokio::test]
    #[ignore = "needs TEST_DATABASE_URL"]
    async fn test_duplicate_id_is_reported() {
        let repo = repository().await;
        let original = player("KL Rahul", "LSG", 4000);

        repo.create(&original).await.unwrap();
        let result = repo.create(&original).await;

        assert!(matches!(
            result,
            Err(ApplicationError::Db(DbError::Duplicate(_)))
        ));
    }

    #[tokio::test]
    #[ignore = "needs TEST_DATABASE_URL"]
    async fn test_list_filters_sorts_and_pages() {
        let repo = repository().await;
        for i in 0..10 {
            repo.create(&player(&format!("Paged {i:02}"), "ZZT", i * 10))
                .await
                .unwrap();
        }
        repo.create(&player("Someone 50% Else", "ZZT", 5)).await.unwrap();

        let page = repo
            .list(&PlayerListQuery {
                team: Some("zzt".to_string()),
                search: Some("paged".to_string()),
                sort_by: SortField::Runs,
                order: SortOrder::Desc,
                page: 2,
                limit: 6,
            })
            .await
            .unwrap();

        assert_eq!(page.total, 10);
        let runs: Vec<i64> = page.players.iter().map(|p| p.runs).collect();
        assert_eq!(runs, vec![30, 20, 10, 0]);

        let literal = repo
            .list(&PlayerListQuery {
                search: Some("50%".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(literal.total, 1);
    }

    #[tokio::test]
    #[ignore = "needs TEST_DATABASE_URL"]
    async fn test_update_and_delete() {
        let repo = repository().await;
        let original = player("Ishan Kishan", "MI", 1500);
        repo.create(&original).await.unwrap();

        let changes = PlayerChanges {
            runs: Some(1600),
            team: Some("srh".to_string()),
            ..Default::default()
        };
        let updated = repo.update(original.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.runs, 1600);
        assert_eq!(updated.team, "SRH");
        assert_eq!(updated.name, original.name);
        assert!(updated.updated_at >= original.updated_at);

        assert!(repo.update(Uuid::new_v4(), &changes).await.unwrap().is_none());

        assert!(repo.delete(original.id).await.unwrap());
        assert!(!repo.delete(original.id).await.unwrap());
        assert!(repo.get_by_id(original.id).await.unwrap().is_none());
    }
}
