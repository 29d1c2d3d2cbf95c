mod get_player_by_id;
mod get_player_image;
mod list_players;

pub use get_player_by_id::GetPlayerByIdHandler;
pub use get_player_image::GetPlayerImageHandler;
pub use list_players::ListPlayersHandler;
