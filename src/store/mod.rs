//! Session storage
//!
//! Each session is one row: its lobby code, its seed and the whole game state
//! as a JSON blob. Updates overwrite the blob; callers serialize their own
//! read-modify-write cycles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GameResult;
use crate::game::GameState;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A stored session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub code: String,
    pub seed: String,
    pub state: GameState,
}

/// Backend holding session rows
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Whether a session with this code exists
    async fn exists(&self, code: &str) -> GameResult<bool>;

    /// Insert a new session; fails with `AlreadyExists` on a taken code
    async fn insert(&self, session: &Session) -> GameResult<()>;

    /// Load a session by code
    async fn load(&self, code: &str) -> GameResult<Option<Session>>;

    /// Overwrite the state blob of an existing session
    async fn save_state(&self, code: &str, state: &GameState) -> GameResult<()>;
}
