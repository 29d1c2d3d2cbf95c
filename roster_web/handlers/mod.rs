mod players;
mod system;

pub use players::{
    create_player, delete_player, get_player, get_player_description, get_player_image,
    list_players, patch_player, put_player,
};
pub use system::{api_info, health, not_found};
