//! Tile materials and map keys

use serde::{Deserialize, Serialize};

/// Material of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tile {
    Grass,
    Dirt,
    Stone,
    Ore,
    Empty,
}

impl Tile {
    /// Whether mining this tile yields anything
    pub fn is_minable(&self) -> bool {
        !matches!(self, Tile::Empty)
    }
}

/// Map key for a grid position, `"x,y"`
pub fn tile_key(x: i64, y: i64) -> String {
    format!("{},{}", x, y)
}
