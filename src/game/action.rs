//! Player actions

use serde::{Deserialize, Serialize};

use super::tile::Tile;
use crate::error::{GameError, GameResult};

/// An action sent by a client, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Dig out the tile at `(x, y)`
    Mine { x: i64, y: i64, name: String },
    /// Step one cell; unknown directions are a no-op
    Move { direction: String, name: String },
    /// Post a chat line
    Chat { message: String, name: String },
}

impl Action {
    /// Parse an action from its JSON form
    pub fn from_value(value: serde_json::Value) -> GameResult<Self> {
        serde_json::from_value(value).map_err(|e| GameError::InvalidAction(e.to_string()))
    }

    /// Name of the acting player
    pub fn player_name(&self) -> &str {
        match self {
            Action::Mine { name, .. } | Action::Move { name, .. } | Action::Chat { name, .. } => {
                name
            }
        }
    }
}

/// What applying an action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// `tile` is `None` when there was nothing to mine
    Mined { x: i64, y: i64, tile: Option<Tile> },
    Moved { x: i64, y: i64 },
    Chatted,
}
