//! Session lifecycle: create, join, poll and act

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::MAX_NAME_LEN;
use crate::error::{GameError, GameResult};
use crate::event_logger::{EventLogger, GameEvent};
use crate::game::{Action, ActionOutcome, GameState};
use crate::lobby::{allocate_code, generate_code, normalize_code};
use crate::rate_limiter::RateLimiter;
use crate::store::{Session, SessionStore};

/// Coordinates the store, lobby codes, rate limiting and event log.
///
/// Join and act are read-modify-write cycles on the whole state blob; they
/// run under a per-session mutex so concurrent requests don't lose updates.
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    locks: DashMap<String, Arc<Mutex<()>>>,
    rate_limiter: RateLimiter,
    event_logger: Arc<EventLogger>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, event_logger: Arc<EventLogger>) -> Self {
        Self::with_rate_limiter(store, event_logger, RateLimiter::new())
    }

    pub fn with_rate_limiter(
        store: Arc<dyn SessionStore>,
        event_logger: Arc<EventLogger>,
        rate_limiter: RateLimiter,
    ) -> Self {
        Self {
            store,
            locks: DashMap::new(),
            rate_limiter,
            event_logger,
        }
    }

    fn lock_for(&self, code: &str) -> Arc<Mutex<()>> {
        self.locks.entry(code.to_string()).or_default().clone()
    }

    /// Drop the session's lock once no request holds or waits on it
    fn release_lock(&self, code: &str, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.locks.remove_if(code, |_, lock| Arc::strong_count(lock) == 1);
    }

    async fn ensure_exists(&self, code: &str) -> GameResult<()> {
        if self.store.exists(code).await? {
            Ok(())
        } else {
            Err(GameError::SessionNotFound)
        }
    }

    async fn load(&self, code: &str) -> GameResult<Session> {
        self.store
            .load(code)
            .await?
            .ok_or(GameError::SessionNotFound)
    }

    /// Open a new session with `name` as its first player
    pub async fn create(&self, name: &str) -> GameResult<Session> {
        let name = validate_name(name)?;

        let code = allocate_code(self.store.as_ref(), || {
            generate_code(&mut rand::thread_rng())
        })
        .await?;
        let seed = Uuid::new_v4().to_string();
        let state = GameState::new(&seed, name);

        let session = Session { code, seed, state };
        self.store.insert(&session).await?;

        info!("Session {} created by {}", session.code, name);
        self.event_logger.log(GameEvent::SessionCreated {
            code: session.code.clone(),
            player: name.to_string(),
        });

        Ok(session)
    }

    /// Add `name` to a session; joining twice under one name is a no-op
    pub async fn join(&self, code: &str, name: &str) -> GameResult<Session> {
        let code = normalize_code(code);
        let name = validate_name(name)?;

        self.ensure_exists(&code).await?;

        let lock = self.lock_for(&code);
        let result = {
            let _guard = lock.lock().await;
            self.add_player(&code, name).await
        };
        self.release_lock(&code, lock);
        result
    }

    async fn add_player(&self, code: &str, name: &str) -> GameResult<Session> {
        let mut session = self.load(code).await?;
        if session.state.add_player(name) {
            self.store.save_state(code, &session.state).await?;

            info!("{} joined session {}", name, code);
            self.event_logger.log(GameEvent::PlayerJoined {
                code: code.to_string(),
                player: name.to_string(),
            });
        } else {
            debug!("{} rejoined session {}", name, code);
        }

        Ok(session)
    }

    /// Current state of a session
    pub async fn state(&self, code: &str) -> GameResult<GameState> {
        let code = normalize_code(code);
        Ok(self.load(&code).await?.state)
    }

    /// Apply a player action and persist the new state
    pub async fn act(&self, code: &str, action: &Action) -> GameResult<GameState> {
        let code = normalize_code(code);
        let player = validate_name(action.player_name())?;

        self.ensure_exists(&code).await?;

        if !self.rate_limiter.check_action(&code, player) {
            let violations = self.rate_limiter.get_violations(&code, player);
            warn!(
                "Player {} in {} rate limited (violations: {})",
                player, code, violations
            );
            self.event_logger.log(GameEvent::RateLimitViolation {
                code,
                player: player.to_string(),
                violation_count: violations,
            });
            return Err(GameError::RateLimited);
        }

        let lock = self.lock_for(&code);
        let result = {
            let _guard = lock.lock().await;
            self.apply(&code, player, action).await
        };
        self.release_lock(&code, lock);
        result
    }

    async fn apply(&self, code: &str, player: &str, action: &Action) -> GameResult<GameState> {
        let mut session = self.load(code).await?;
        let now_ms = chrono::Utc::now().timestamp_millis();
        let outcome = session.state.apply(action, now_ms)?;
        self.store.save_state(code, &session.state).await?;

        debug!("{} in {}: {:?}", player, code, outcome);
        if let Some(event) = outcome_event(code, player, outcome) {
            self.event_logger.log(event);
        }

        Ok(session.state)
    }
}

fn outcome_event(code: &str, player: &str, outcome: ActionOutcome) -> Option<GameEvent> {
    let code = code.to_string();
    let player = player.to_string();

    match outcome {
        ActionOutcome::Mined {
            x,
            y,
            tile: Some(tile),
        } => Some(GameEvent::TileMined {
            code,
            player,
            x,
            y,
            tile,
        }),
        ActionOutcome::Mined { tile: None, .. } => None,
        ActionOutcome::Moved { x, y } => Some(GameEvent::PlayerMoved { code, player, x, y }),
        ActionOutcome::Chatted => Some(GameEvent::ChatPosted { code, player }),
    }
}

/// Trimmed player name, rejected when empty or too long
pub fn validate_name(name: &str) -> GameResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GameError::bad_request("Name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(GameError::bad_request(format!(
            "Name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name)
}
