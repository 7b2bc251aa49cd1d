//! Per-player action rate limiting

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::{MAX_ACTIONS_PER_SECOND, RATE_LIMIT_WINDOW_MS};

/// Checks between sweeps of idle players
const PRUNE_INTERVAL: u64 = 256;

/// Rate limiter state for a single player
#[derive(Debug)]
pub struct PlayerRateState {
    /// Timestamps of recent actions
    action_times: VecDeque<Instant>,
    /// Number of rate limit violations
    violations: u32,
}

impl PlayerRateState {
    pub fn new() -> Self {
        Self {
            action_times: VecDeque::with_capacity(MAX_ACTIONS_PER_SECOND as usize + 10),
            violations: 0,
        }
    }

    /// Remove timestamps that fell out of the window ending at `now`
    fn expire(&mut self, now: Instant, window: Duration) {
        let window_start = now.checked_sub(window).unwrap_or(now);

        while let Some(front) = self.action_times.front() {
            if *front < window_start {
                self.action_times.pop_front();
            } else {
                break;
            }
        }
    }

    /// Record an action at `now` if the window has room
    pub fn check_action(&mut self, now: Instant, max_actions: u32, window: Duration) -> bool {
        self.expire(now, window);

        if self.action_times.len() < max_actions as usize {
            self.action_times.push_back(now);
            true
        } else {
            self.violations += 1;
            false
        }
    }

    /// Get current violation count
    pub fn violation_count(&self) -> u32 {
        self.violations
    }

    /// Get actions in current window
    pub fn actions_in_window(&self) -> usize {
        self.action_times.len()
    }
}

impl Default for PlayerRateState {
    fn default() -> Self {
        Self::new()
    }
}

/// Rate limiter keyed by session code and player name
pub struct RateLimiter {
    players: DashMap<String, PlayerRateState>,
    max_actions: u32,
    window: Duration,
    checks: AtomicU64,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_limit(
            MAX_ACTIONS_PER_SECOND,
            Duration::from_millis(RATE_LIMIT_WINDOW_MS),
        )
    }

    pub fn with_limit(max_actions: u32, window: Duration) -> Self {
        Self {
            players: DashMap::new(),
            max_actions,
            window,
            checks: AtomicU64::new(0),
        }
    }

    fn key(code: &str, name: &str) -> String {
        format!("{}:{}", code, name)
    }

    /// Check if an action from a player is allowed, tracking the player on first use
    pub fn check_action(&self, code: &str, name: &str) -> bool {
        let now = Instant::now();
        if self.checks.fetch_add(1, Ordering::Relaxed) % PRUNE_INTERVAL == PRUNE_INTERVAL - 1 {
            self.prune_idle(now);
        }

        self.players
            .entry(Self::key(code, name))
            .or_default()
            .check_action(now, self.max_actions, self.window)
    }

    /// Forget players with no actions left in the window ending at `now`
    pub fn prune_idle(&self, now: Instant) {
        let window = self.window;
        self.players.retain(|_, state| {
            state.expire(now, window);
            state.actions_in_window() > 0
        });
    }

    #[cfg(test)]
    pub fn tracked_players(&self) -> usize {
        self.players.len()
    }

    /// Get violation count for a player
    pub fn get_violations(&self, code: &str, name: &str) -> u32 {
        self.players
            .get(&Self::key(code, name))
            .map(|s| s.violation_count())
            .unwrap_or(0)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
