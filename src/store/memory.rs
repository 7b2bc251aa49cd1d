//! In-memory session store

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{Session, SessionStore};
use crate::error::{GameError, GameResult};
use crate::game::GameState;

/// Sessions kept in a concurrent map; lost on restart
#[derive(Default)]
pub struct MemoryStore {
    sessions: DashMap<String, Session>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn exists(&self, code: &str) -> GameResult<bool> {
        Ok(self.sessions.contains_key(code))
    }

    async fn insert(&self, session: &Session) -> GameResult<()> {
        match self.sessions.entry(session.code.clone()) {
            Entry::Occupied(_) => Err(GameError::AlreadyExists(session.code.clone())),
            Entry::Vacant(slot) => {
                slot.insert(session.clone());
                Ok(())
            }
        }
    }

    async fn load(&self, code: &str) -> GameResult<Option<Session>> {
        Ok(self.sessions.get(code).map(|entry| entry.value().clone()))
    }

    async fn save_state(&self, code: &str, state: &GameState) -> GameResult<()> {
        let mut session = self
            .sessions
            .get_mut(code)
            .ok_or(GameError::SessionNotFound)?;
        session.state = state.clone();
        Ok(())
    }
}
