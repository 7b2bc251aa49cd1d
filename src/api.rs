//! HTTP API handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::game::{Action, GameState};
use crate::state::AppState;

// ============ Request Types ============

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub name: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub code: Option<String>,
    pub action: Option<serde_json::Value>,
}

// ============ Response Types ============

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub code: String,
    pub state: GameState,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub state: GameState,
}

/// Treat missing and blank strings alike
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn malformed(rejection: JsonRejection) -> GameError {
    GameError::bad_request(rejection.body_text())
}

// ============ Handlers ============

/// Health check endpoint
pub async fn health_handler() -> &'static str {
    "OK"
}

/// POST /api/session/create
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> GameResult<Json<SessionResponse>> {
    let Json(req) = payload.map_err(malformed)?;
    let name = present(req.name).ok_or_else(|| GameError::bad_request("Name is required"))?;

    let session = state.sessions.create(&name).await?;
    Ok(Json(SessionResponse {
        code: session.code,
        state: session.state,
    }))
}

/// POST /api/session/join
pub async fn join_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JoinRequest>, JsonRejection>,
) -> GameResult<Json<SessionResponse>> {
    let Json(req) = payload.map_err(malformed)?;
    let (Some(name), Some(code)) = (present(req.name), present(req.code)) else {
        return Err(GameError::bad_request("Name and code are required"));
    };

    let session = state.sessions.join(&code, &name).await?;
    Ok(Json(SessionResponse {
        code: session.code,
        state: session.state,
    }))
}

/// GET /api/session/state?code=...
pub async fn session_state(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StateQuery>,
) -> GameResult<Json<StateResponse>> {
    let code =
        present(query.code).ok_or_else(|| GameError::bad_request("Session code is required"))?;

    let game = state.sessions.state(&code).await?;
    Ok(Json(StateResponse { state: game }))
}

/// POST /api/session/action
pub async fn session_action(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> GameResult<Json<StateResponse>> {
    let Json(req) = payload.map_err(malformed)?;
    let (Some(code), Some(action)) = (present(req.code), req.action) else {
        return Err(GameError::bad_request("Missing code or action"));
    };
    let action = Action::from_value(action)?;

    let game = state.sessions.act(&code, &action).await?;
    Ok(Json(StateResponse { state: game }))
}
