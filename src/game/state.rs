//! Session game state, stored as one JSON blob

use serde::{Deserialize, Serialize};

use super::action::{Action, ActionOutcome};
use super::direction::Direction;
use super::map::{generate_map, TileMap};
use super::player::Player;
use super::tile::{tile_key, Tile};
use crate::config::{MAX_CHAT_HISTORY, MAX_CHAT_LEN};
use crate::error::{GameError, GameResult};

/// A chat line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub name: String,
    pub message: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

/// Whole state of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub map: TileMap,
    pub players: Vec<Player>,
    pub chat: Vec<ChatMessage>,
}

impl GameState {
    /// Fresh state for a new session: generated map, creator at spawn
    pub fn new(seed: &str, creator: &str) -> Self {
        Self {
            map: generate_map(seed),
            players: vec![Player::new(creator)],
            chat: Vec::new(),
        }
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    fn player_mut(&mut self, name: &str) -> GameResult<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or(GameError::PlayerNotFound)
    }

    /// Add a player at spawn unless one with this name exists.
    /// Returns whether the state changed.
    pub fn add_player(&mut self, name: &str) -> bool {
        if self.player(name).is_some() {
            return false;
        }
        self.players.push(Player::new(name));
        true
    }

    pub fn tile(&self, x: i64, y: i64) -> Option<Tile> {
        self.map.get(&tile_key(x, y)).copied()
    }

    /// Apply an action; `now_ms` stamps chat lines
    pub fn apply(&mut self, action: &Action, now_ms: i64) -> GameResult<ActionOutcome> {
        match action {
            Action::Mine { x, y, name } => self.mine(name, *x, *y),
            Action::Move { direction, name } => {
                let direction = Direction::from_str(direction).unwrap_or_default();
                let player = self.player_mut(name)?;
                player.step(direction);
                Ok(ActionOutcome::Moved {
                    x: player.x,
                    y: player.y,
                })
            }
            Action::Chat { message, name } => {
                self.post_chat(name, message, now_ms)?;
                Ok(ActionOutcome::Chatted)
            }
        }
    }

    fn mine(&mut self, name: &str, x: i64, y: i64) -> GameResult<ActionOutcome> {
        // Checked before touching the map so a failed mine changes nothing
        self.player_mut(name)?;

        let key = tile_key(x, y);
        let mined = match self.map.get(&key).copied() {
            Some(tile) if tile.is_minable() => {
                self.map.insert(key, Tile::Empty);
                Some(tile)
            }
            _ => None,
        };

        if let Some(tile) = mined {
            self.player_mut(name)?.collect(tile);
        }

        Ok(ActionOutcome::Mined { x, y, tile: mined })
    }

    fn post_chat(&mut self, name: &str, message: &str, now_ms: i64) -> GameResult<()> {
        let cleaned = sanitize_message(message);
        if cleaned.is_empty() {
            return Err(GameError::bad_request("Message is required"));
        }

        self.chat.push(ChatMessage {
            name: name.to_string(),
            message: cleaned,
            timestamp: now_ms,
        });

        if self.chat.len() > MAX_CHAT_HISTORY {
            let excess = self.chat.len() - MAX_CHAT_HISTORY;
            self.chat.drain(..excess);
        }
        Ok(())
    }
}

/// Cap the length of a chat line, then strip dangerous HTML.
/// The cap counts raw characters so escaping never cuts an entity.
fn sanitize_message(input: &str) -> String {
    let capped: String = input.trim().chars().take(MAX_CHAT_LEN).collect();
    ammonia::clean(&capped).trim().to_string()
}
