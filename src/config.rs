//! Game configuration constants and runtime settings

use std::env;

// =============================================================================
// Map generation
// =============================================================================

/// Map width in tiles, centred on x = 0
pub const MAP_WIDTH: i64 = 32;

/// Map depth in tiles, starting at the surface (y = 0)
pub const MAP_HEIGHT: i64 = 32;

/// Rows shallower than this are dirt
pub const DIRT_DEPTH: i64 = 5;

/// Rows shallower than this (and below the dirt) are plain stone
pub const STONE_DEPTH: i64 = 10;

/// Rows shallower than this carry the richer ore chance
pub const RICH_ORE_DEPTH: i64 = 15;

/// Ore chance in the rich band
pub const RICH_ORE_CHANCE: f64 = 0.10;

/// Ore chance below the rich band
pub const DEEP_ORE_CHANCE: f64 = 0.05;

// =============================================================================
// Lobby codes
// =============================================================================

/// Length of a lobby code
pub const CODE_LENGTH: usize = 4;

/// Characters a lobby code is drawn from
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Codes tried before giving up (one draw plus five retries)
pub const MAX_CODE_ATTEMPTS: usize = 6;

// =============================================================================
// Players and chat
// =============================================================================

/// Longest accepted player name, in characters
pub const MAX_NAME_LEN: usize = 24;

/// Longest accepted chat message, in characters
pub const MAX_CHAT_LEN: usize = 280;

/// Chat entries kept in the state blob
pub const MAX_CHAT_HISTORY: usize = 100;

// =============================================================================
// Rate Limiting
// =============================================================================

/// Maximum actions per second per player per session
pub const MAX_ACTIONS_PER_SECOND: u32 = 20;

/// Time window for rate limiting (in milliseconds)
pub const RATE_LIMIT_WINDOW_MS: u64 = 1000;

// =============================================================================
// Runtime configuration
// =============================================================================

/// Default SQLite database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:deep_diggers.db?mode=rwc";

/// Default event log file
pub const DEFAULT_EVENT_LOG_FILE: &str = "game_events.log";

/// Runtime configuration, read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `sqlite:...` URL, or `memory` for a non-persistent store
    pub database_url: String,
    /// Single allowed origin; any origin is allowed when unset
    pub cors_origin: Option<String>,
    /// JSONL event log path; logging is off when unset
    pub event_log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            cors_origin: None,
            event_log_file: Some(DEFAULT_EVENT_LOG_FILE.to_string()),
        }
    }
}

impl AppConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database_url: lookup("DATABASE_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.database_url),
            cors_origin: lookup("CORS_ORIGIN").filter(|origin| !origin.trim().is_empty()),
            event_log_file: match lookup("EVENT_LOG_FILE") {
                Some(path) if path.trim().is_empty() => None,
                Some(path) => Some(path),
                None => defaults.event_log_file,
            },
        }
    }

    /// Full bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether sessions live only in memory
    pub fn uses_memory_store(&self) -> bool {
        self.database_url.eq_ignore_ascii_case("memory")
    }
}
