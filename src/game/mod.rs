//! Game module

pub mod action;
pub mod direction;
pub mod map;
pub mod player;
pub mod state;
pub mod tile;

pub use action::{Action, ActionOutcome};
pub use direction::Direction;
pub use map::{generate_map, TileMap};
pub use player::Player;
pub use state::{ChatMessage, GameState};
pub use tile::{tile_key, Tile};
