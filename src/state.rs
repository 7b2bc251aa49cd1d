//! Application state shared across all handlers

use std::sync::Arc;

use crate::event_logger::EventLogger;
use crate::session::SessionService;
use crate::store::{MemoryStore, SessionStore};

/// Shared application state
pub struct AppState {
    pub sessions: SessionService,
}

impl AppState {
    pub fn new(store: Arc<dyn SessionStore>, event_logger: Arc<EventLogger>) -> Self {
        Self {
            sessions: SessionService::new(store, event_logger),
        }
    }

    /// Memory-backed state with event logging off (for testing)
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(EventLogger::disabled()))
    }
}
