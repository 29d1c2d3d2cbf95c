#[cfg(any(test, feature = "test-utils"))]
#[cfg(not(tarpaulin_include))]
pub mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use std::{
        cmp::Ordering,
        collections::HashMap,
        io::Cursor,
        path::PathBuf,
        sync::{Arc, Mutex},
    };
    use uuid::Uuid;

    use roster_types::{
        errors::{ApplicationError, DbError},
        player::{Player, PlayerChanges, PlayerFields, Role, normalize_team},
    };

    use crate::{
        config::{Config, Environment},
        images::ImageStore,
        repository::{PlayerListQuery, PlayerPage, PlayerRepository, SortField, SortOrder},
        uow::{UnitOfWork, UnitOfWorkProvider},
    };

    /// In-memory players table. Clones share the same storage.
    #[derive(Default, Clone)]
    pub struct MockPlayerRepository {
        players: Arc<Mutex<HashMap<Uuid, Player>>>,
    }

    impl MockPlayerRepository {
        pub fn new() -> Self {
            Default::default()
        }

        pub fn count(&self) -> usize {
            self.players.lock().unwrap().len()
        }
    }

    fn compare(a: &Player, b: &Player, field: SortField) -> Ordering {
        match field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Team => a.team.cmp(&b.team),
            SortField::Country => a.country.cmp(&b.country),
            SortField::Runs => a.runs.cmp(&b.runs),
            SortField::Salary => a.salary.total_cmp(&b.salary),
            SortField::Role => role_rank(a.role).cmp(&role_rank(b.role)),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }

    fn role_rank(role: Role) -> usize {
        Role::ALL.iter().position(|r| *r == role).unwrap_or(0)
    }

    #[async_trait]
    impl PlayerRepository for MockPlayerRepository {
        async fn create(&self, player: &Player) -> Result<Player, ApplicationError> {
            let mut players = self.players.lock().unwrap();
            if players.contains_key(&player.id) {
                return Err(DbError::Duplicate("players_pkey".to_string()).into());
            }
            players.insert(player.id, player.clone());
            Ok(player.clone())
        }

        async fn list(&self, query: &PlayerListQuery) -> Result<PlayerPage, ApplicationError> {
            let search = query.search.as_ref().map(|s| s.to_lowercase());
            let team = query.team.as_deref().map(normalize_team);

            let mut matches: Vec<Player> = self
                .players
                .lock()
                .unwrap()
                .values()
                .filter(|p| {
                    search
                        .as_ref()
                        .is_none_or(|s| p.name.to_lowercase().contains(s.as_str()))
                })
                .filter(|p| team.as_ref().is_none_or(|t| &p.team == t))
                .cloned()
                .collect();

            matches.sort_by(|a, b| {
                let ord = compare(a, b, query.sort_by);
                let ord = match query.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                };
                ord.then_with(|| a.id.cmp(&b.id))
            });

            let total = matches.len() as i64;
            let players = matches
                .into_iter()
                .skip(query.offset() as usize)
                .take(query.limit as usize)
                .collect();

            Ok(PlayerPage { players, total })
        }

        async fn get_by_id(&self, player_id: Uuid) -> Result<Option<Player>, ApplicationError> {
            Ok(self.players.lock().unwrap().get(&player_id).cloned())
        }

        async fn update(
            &self,
            player_id: Uuid,
            changes: &PlayerChanges,
        ) -> Result<Option<Player>, ApplicationError> {
            let mut players = self.players.lock().unwrap();
            Ok(players.get_mut(&player_id).map(|player| {
                changes.apply_to(player, Utc::now());
                player.clone()
            }))
        }

        async fn delete(&self, player_id: Uuid) -> Result<bool, ApplicationError> {
            Ok(self.players.lock().unwrap().remove(&player_id).is_some())
        }
    }

    /// Writes go straight to the shared repository; commit and rollback
    /// only record that they were called.
    #[derive(Default, Clone)]
    pub struct MockUnitOfWork {
        players: Arc<MockPlayerRepository>,

        // Flags to check if commit/rollback was called
        committed: Arc<Mutex<bool>>,
        rolled_back: Arc<Mutex<bool>>,
        fail_commit: bool,
    }

    impl MockUnitOfWork {
        pub fn new() -> Self {
            Default::default()
        }

        pub fn with_players(players: Arc<MockPlayerRepository>) -> Self {
            Self {
                players,
                ..Default::default()
            }
        }

        /// A unit of work whose `commit` always errors.
        pub fn failing_commit(players: Arc<MockPlayerRepository>) -> Self {
            Self {
                players,
                fail_commit: true,
                ..Default::default()
            }
        }

        pub fn committed(&self) -> bool {
            *self.committed.lock().unwrap()
        }

        pub fn rolled_back(&self) -> bool {
            *self.rolled_back.lock().unwrap()
        }
    }

    #[async_trait]
    impl<'a> UnitOfWork<'a> for MockUnitOfWork {
        fn players(&self) -> Arc<dyn PlayerRepository + 'a> {
            self.players.clone()
        }

        async fn commit(self: Box<Self>) -> Result<(), ApplicationError> {
            if self.fail_commit {
                return Err(ApplicationError::Infrastructure("commit failed".to_string()));
            }
            *self.committed.lock().unwrap() = true;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), ApplicationError> {
            *self.rolled_back.lock().unwrap() = true;
            Ok(())
        }
    }

    /// Hands out units of work over one shared in-memory repository.
    #[derive(Default, Clone)]
    pub struct MockUnitOfWorkProvider {
        players: Arc<MockPlayerRepository>,
        fail_commits: bool,
    }

    impl MockUnitOfWorkProvider {
        pub fn new() -> Self {
            Default::default()
        }

        /// Every unit of work handed out fails to commit.
        pub fn failing_commits() -> Self {
            Self {
                fail_commits: true,
                ..Default::default()
            }
        }

        pub fn players(&self) -> Arc<MockPlayerRepository> {
            self.players.clone()
        }
    }

    #[async_trait]
    impl UnitOfWorkProvider for MockUnitOfWorkProvider {
        async fn tx<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError> {
            let uow: Box<dyn UnitOfWork<'_> + '_> = if self.fail_commits {
                Box::new(MockUnitOfWork::failing_commit(self.players.clone()))
            } else {
                Box::new(MockUnitOfWork::with_players(self.players.clone()))
            };
            Ok(uow)
        }
    }

    #[derive(Default)]
    pub struct MockImageStore {
        files: Mutex<HashMap<String, Vec<u8>>>,
        fail_removals: Mutex<bool>,
    }

    impl MockImageStore {
        pub fn new() -> Self {
            Default::default()
        }

        pub fn contains(&self, filename: &str) -> bool {
            self.files.lock().unwrap().contains_key(filename)
        }

        pub fn len(&self) -> usize {
            self.files.lock().unwrap().len()
        }

        /// Makes every later `remove` call fail.
        pub fn fail_removals(&self) {
            *self.fail_removals.lock().unwrap() = true;
        }
    }

    #[async_trait]
    impl ImageStore for MockImageStore {
        async fn save(&self, bytes: Vec<u8>, extension: &str) -> Result<String, ApplicationError> {
            let filename = format!("{}.{}", Uuid::new_v4(), extension);
            self.files.lock().unwrap().insert(filename.clone(), bytes);
            Ok(filename)
        }

        async fn load(&self, filename: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
            Ok(self.files.lock().unwrap().get(filename).cloned())
        }

        async fn remove(&self, filename: &str) -> Result<(), ApplicationError> {
            if *self.fail_removals.lock().unwrap() {
                return Err(ApplicationError::Infrastructure(format!(
                    "cannot remove {filename}"
                )));
            }
            self.files.lock().unwrap().remove(filename);
            Ok(())
        }
    }

    pub fn test_config() -> Arc<Config> {
        Arc::new(Config {
            host: "127.0.0.1".to_string(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            environment: Environment::Production,
        })
    }

    /// A batsman from India with the given name, team and runs.
    pub fn player_fields(name: &str, team: &str, runs: i64) -> PlayerFields {
        PlayerFields {
            name: name.to_string(),
            team: team.to_string(),
            country: "India".to_string(),
            runs,
            salary: 1_000_000.0,
            role: Role::Batsman,
        }
    }

    /// A valid PNG of the given size.
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });

        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }
}
