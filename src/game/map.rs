//! Seeded procedural map generation

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use super::tile::{tile_key, Tile};
use crate::config::{
    DEEP_ORE_CHANCE, DIRT_DEPTH, MAP_HEIGHT, MAP_WIDTH, RICH_ORE_CHANCE, RICH_ORE_DEPTH,
    STONE_DEPTH,
};

/// Flat dictionary from `"x,y"` to tile
pub type TileMap = BTreeMap<String, Tile>;

/// RNG derived from the SHA-256 digest of a session seed
pub fn seeded_rng(seed: &str) -> StdRng {
    let digest = Sha256::digest(seed.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    StdRng::from_seed(bytes)
}

/// Pick the tile for a row
fn tile_for_depth<R: Rng>(y: i64, rng: &mut R) -> Tile {
    if y == 0 {
        Tile::Grass
    } else if y < DIRT_DEPTH {
        Tile::Dirt
    } else if y < STONE_DEPTH {
        Tile::Stone
    } else if y < RICH_ORE_DEPTH {
        if rng.gen_bool(RICH_ORE_CHANCE) {
            Tile::Ore
        } else {
            Tile::Stone
        }
    } else if rng.gen_bool(DEEP_ORE_CHANCE) {
        Tile::Ore
    } else {
        Tile::Stone
    }
}

/// Generate the map for a session seed
///
/// The grid spans `x` in `[-MAP_WIDTH/2, MAP_WIDTH/2)` and `y` in
/// `[0, MAP_HEIGHT)`, surface at the top. The same seed always yields the
/// same map.
pub fn generate_map(seed: &str) -> TileMap {
    let mut rng = seeded_rng(seed);
    let half_w = MAP_WIDTH / 2;
    let mut map = TileMap::new();

    for x in -half_w..half_w {
        for y in 0..MAP_HEIGHT {
            map.insert(tile_key(x, y), tile_for_depth(y, &mut rng));
        }
    }

    map
}
