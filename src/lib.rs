//! Deep Diggers game server
//!
//! Players create or join a lobby by short code and mine, move and chat on a
//! shared tile grid. Each session's state is a single JSON blob; clients poll
//! for it.

pub mod api;
pub mod assets;
pub mod config;
pub mod error;
pub mod event_logger;
pub mod game;
pub mod lobby;
pub mod rate_limiter;
pub mod session;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::{GameError, GameResult};
pub use state::AppState;

/// CORS policy: a single origin with credentials, or any origin without
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    };

    match HeaderValue::from_str(origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(e) => {
            warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
            cors_layer(None)
        }
    }
}

/// Build the router
pub fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(assets::index_handler))
        .route("/health", get(api::health_handler))
        .route("/api/session/create", post(api::create_session))
        .route("/api/session/join", post(api::join_session))
        .route("/api/session/state", get(api::session_state))
        .route("/api/session/action", post(api::session_action))
        .route("/{*path}", get(assets::static_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
