//! Embedded web client

use axum::{extract::Path, http::StatusCode, response::IntoResponse};
use rust_embed::Embed;

/// Embedded static files
#[derive(Embed)]
#[folder = "static/"]
struct Assets;

/// Serve embedded static files
async fn serve_static(path: &str) -> impl IntoResponse {
    let path = if path.is_empty() { "index.html" } else { path };

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [("content-type", mime.as_ref())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// Index page handler
pub async fn index_handler() -> impl IntoResponse {
    serve_static("index.html").await
}

/// Static file handler
pub async fn static_handler(Path(path): Path<String>) -> impl IntoResponse {
    serve_static(&path).await
}
