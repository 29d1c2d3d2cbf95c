use uuid::Uuid;

use roster_types::player::Player;

use crate::cqrs::Query;
use crate::repository::{PlayerListQuery, PlayerPage};

/// One filtered, sorted page of players.
pub struct ListPlayers {
    pub query: PlayerListQuery,
}

impl Query for ListPlayers {
    type Output = PlayerPage;
}

/// Fetch the player entity by player id.
pub struct GetPlayerById {
    pub player_id: Uuid,
}

impl Query for GetPlayerById {
    type Output = Player;
}

/// Fetch the stored profile image bytes of a player.
pub struct GetPlayerImage {
    pub player_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct PlayerImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl Query for GetPlayerImage {
    type Output = PlayerImage;
}
