use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Session not found")]
    SessionNotFound,

    #[error("Player not found")]
    PlayerNotFound,

    #[error("Too many actions, slow down")]
    RateLimited,

    #[error("Session already exists: {0}")]
    AlreadyExists(String),

    #[error("Could not allocate a lobby code")]
    CodeSpaceExhausted,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("State serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type GameResult<T> = Result<T, GameError>;

impl GameError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidAction(_) => StatusCode::BAD_REQUEST,
            Self::SessionNotFound | Self::PlayerNotFound => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::AlreadyExists(_)
            | Self::CodeSpaceExhausted
            | Self::Database(_)
            | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
