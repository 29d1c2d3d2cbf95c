mod player_repository;

pub use player_repository::{PlayerListQuery, PlayerPage, PlayerRepository, SortField, SortOrder};
