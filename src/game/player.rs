//! Player entity

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::tile::Tile;

/// A player in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub x: i64,
    pub y: i64,
    /// Mined tile counts by material
    #[serde(default)]
    pub inventory: BTreeMap<Tile, u32>,
}

impl Player {
    /// Create a player at the spawn point with an empty inventory
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: 0,
            y: 0,
            inventory: BTreeMap::new(),
        }
    }

    /// Step one cell; no bounds are enforced
    pub fn step(&mut self, direction: Direction) {
        let (dx, dy) = direction.delta();
        self.x += dx;
        self.y += dy;
    }

    /// Add one unit of a material to the inventory
    pub fn collect(&mut self, tile: Tile) {
        *self.inventory.entry(tile).or_insert(0) += 1;
    }

    pub fn count(&self, tile: Tile) -> u32 {
        self.inventory.get(&tile).copied().unwrap_or(0)
    }
}
