//! Direction enum for player movement

/// Direction of movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// No movement
    #[default]
    None,
    /// Moving up (towards the surface)
    North,
    /// Moving down (deeper)
    South,
    /// Moving left
    West,
    /// Moving right
    East,
}

impl Direction {
    /// Parse direction from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Some(Direction::None),
            "north" | "up" => Some(Direction::North),
            "south" | "down" => Some(Direction::South),
            "west" | "left" => Some(Direction::West),
            "east" | "right" => Some(Direction::East),
            _ => None,
        }
    }

    /// Unit step `(dx, dy)`; y grows downwards
    pub fn delta(&self) -> (i64, i64) {
        match self {
            Direction::None => (0, 0),
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }
}
