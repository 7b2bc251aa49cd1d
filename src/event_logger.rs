//! Game event logging for replay and analysis

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::Mutex;

use serde::Serialize;
use tracing::{error, info};

use crate::game::Tile;

/// Types of game events that can be logged
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    SessionCreated {
        code: String,
        player: String,
    },
    PlayerJoined {
        code: String,
        player: String,
    },
    TileMined {
        code: String,
        player: String,
        x: i64,
        y: i64,
        tile: Tile,
    },
    PlayerMoved {
        code: String,
        player: String,
        x: i64,
        y: i64,
    },
    ChatPosted {
        code: String,
        player: String,
    },
    RateLimitViolation {
        code: String,
        player: String,
        violation_count: u32,
    },
}

/// Logged event with timestamp
#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    /// Unix timestamp in milliseconds
    timestamp_ms: i64,
    #[serde(flatten)]
    event: &'a GameEvent,
}

/// Appends one JSON line per event
pub struct EventLogger {
    /// File writer (None if logging disabled)
    writer: Option<Mutex<BufWriter<File>>>,
}

impl EventLogger {
    /// Open `path` for appending; logging is disabled when `path` is `None`
    /// or the file cannot be opened
    pub fn new(path: Option<&str>) -> Self {
        let Some(path) = path else {
            info!("Event logging is disabled");
            return Self::disabled();
        };

        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                info!("Event logging enabled, writing to {}", path);
                Self {
                    writer: Some(Mutex::new(BufWriter::new(file))),
                }
            }
            Err(e) => {
                error!("Failed to open event log file {}: {}", path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    /// Log a game event
    pub fn log(&self, event: GameEvent) {
        let Some(ref writer) = self.writer else {
            return;
        };

        let entry = LogEntry {
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            event: &event,
        };

        if let Ok(mut w) = writer.lock() {
            if let Ok(json) = serde_json::to_string(&entry) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
