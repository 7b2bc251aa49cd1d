//! Deep Diggers HTTP server

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deep_diggers::config::AppConfig;
use deep_diggers::event_logger::EventLogger;
use deep_diggers::store::{MemoryStore, SessionStore, SqliteStore};
use deep_diggers::{build_router, cors_layer, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deep_diggers=debug,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::from_env();

    let store: Arc<dyn SessionStore> = if config.uses_memory_store() {
        info!("Sessions are kept in memory only");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(SqliteStore::connect(&config.database_url).await?)
    };
    let event_logger = Arc::new(EventLogger::new(config.event_log_file.as_deref()));

    let state = Arc::new(AppState::new(store, event_logger));
    let app = build_router(state, cors_layer(config.cors_origin.as_deref()));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("⛏️  Deep Diggers running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
