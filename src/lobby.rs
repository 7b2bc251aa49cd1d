//! Lobby code generation and allocation

use rand::Rng;
use tracing::debug;

use crate::config::{CODE_ALPHABET, CODE_LENGTH, MAX_CODE_ATTEMPTS};
use crate::error::{GameError, GameResult};
use crate::store::SessionStore;

/// Draw a random lobby code
pub fn generate_code<R: Rng>(rng: &mut R) -> String {
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Canonical form of a user-typed code
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Find a code no session uses yet.
///
/// Tries at most `MAX_CODE_ATTEMPTS` candidates from `next_code`.
pub async fn allocate_code<S, F>(store: &S, mut next_code: F) -> GameResult<String>
where
    S: SessionStore + ?Sized,
    F: FnMut() -> String,
{
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = next_code();
        if !store.exists(&code).await? {
            return Ok(code);
        }
        debug!("Lobby code {} taken (attempt {})", code, attempt);
    }

    Err(GameError::CodeSpaceExhausted)
}
