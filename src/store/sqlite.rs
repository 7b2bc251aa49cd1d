//! SQLite session store
//!
//! Schema: one `sessions` table, state kept as a JSON text column.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use super::{Session, SessionStore};
use crate::error::{GameError, GameResult};
use crate::game::GameState;

const CREATE_SESSIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    seed TEXT NOT NULL,
    state TEXT NOT NULL
)";

/// Row type for the `sessions` table
#[derive(Debug, Clone, sqlx::FromRow)]
struct SessionRow {
    code: String,
    seed: String,
    state: String,
}

impl SessionRow {
    fn into_session(self) -> GameResult<Session> {
        let state: GameState = serde_json::from_str(&self.state)?;
        Ok(Session {
            code: self.code,
            seed: self.seed,
            state,
        })
    }
}

/// Sessions persisted in SQLite
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `database_url`
    pub async fn connect(database_url: &str) -> GameResult<Self> {
        let options = database_url
            .parse::<SqliteConnectOptions>()?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!("Connected to session database {}", database_url);
        Self::with_pool(pool).await
    }

    /// Private in-memory database.
    /// A single connection that never expires, so the data outlives idle periods.
    pub async fn in_memory() -> GameResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema if needed
    pub async fn with_pool(pool: SqlitePool) -> GameResult<Self> {
        sqlx::query(CREATE_SESSIONS_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn exists(&self, code: &str) -> GameResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM sessions WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn insert(&self, session: &Session) -> GameResult<()> {
        let state = serde_json::to_string(&session.state)?;
        let result = sqlx::query("INSERT INTO sessions (code, seed, state) VALUES (?, ?, ?)")
            .bind(&session.code)
            .bind(&session.seed)
            .bind(state)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(GameError::AlreadyExists(session.code.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn load(&self, code: &str) -> GameResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT code, seed, state FROM sessions WHERE code = ?",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SessionRow::into_session).transpose()
    }

    async fn save_state(&self, code: &str, state: &GameState) -> GameResult<()> {
        let state = serde_json::to_string(state)?;
        let result = sqlx::query("UPDATE sessions SET state = ? WHERE code = ?")
            .bind(state)
            .bind(code)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(GameError::SessionNotFound);
        }
        Ok(())
    }
}
