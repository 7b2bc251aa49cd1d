//! Router-level tests for the session API

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use deep_diggers::event_logger::EventLogger;
use deep_diggers::store::SqliteStore;
use deep_diggers::{build_router, cors_layer, AppState};

fn test_app() -> Router {
    build_router(Arc::new(AppState::in_memory()), cors_layer(None))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn create(app: &Router, name: &str) -> String {
    let (status, body) = post(app, "/api/session/create", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::OK);
    body["code"].as_str().unwrap().to_string()
}

fn player<'a>(state: &'a Value, name: &str) -> &'a Value {
    state["players"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == name)
        .unwrap()
}

#[tokio::test]
async fn health_check() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_returns_code_and_state() {
    let app = test_app();
    let (status, body) = post(&app, "/api/session/create", json!({ "name": "ada" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"].as_str().unwrap().len(), 4);
    assert_eq!(body["state"]["map"]["0,0"], "grass");
    assert!(body["state"]["map"]["-16,31"].is_string());
    assert_eq!(body["state"]["chat"], json!([]));
    assert_eq!(
        body["state"]["players"],
        json!([{ "name": "ada", "x": 0, "y": 0, "inventory": {} }])
    );
}

#[tokio::test]
async fn create_requires_name() {
    let app = test_app();
    let (status, body) = post(&app, "/api/session/create", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");

    let (status, _) = post(&app, "/api/session/create", json!({ "name": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/session/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn join_flow() {
    let app = test_app();
    let code = create(&app, "ada").await;

    let (status, body) = post(
        &app,
        "/api/session/join",
        json!({ "name": "bob", "code": code.to_lowercase() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], code.as_str());
    assert_eq!(body["state"]["players"].as_array().unwrap().len(), 2);

    // Joining again under the same name adds nobody
    let (_, body) = post(&app, "/api/session/join", json!({ "name": "bob", "code": code })).await;
    assert_eq!(body["state"]["players"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn join_errors() {
    let app = test_app();

    let (status, body) = post(&app, "/api/session/join", json!({ "name": "bob" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and code are required");

    let (status, body) = post(
        &app,
        "/api/session/join",
        json!({ "name": "bob", "code": "NOPE" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Session not found");
}

#[tokio::test]
async fn state_polling() {
    let app = test_app();
    let code = create(&app, "ada").await;

    let (status, body) = get(&app, &format!("/api/session/state?code={}", code)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["players"][0]["name"], "ada");

    let (status, body) = get(&app, "/api/session/state").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Session code is required");

    let (status, _) = get(&app, "/api/session/state?code=NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mine_move_chat() {
    let app = test_app();
    let code = create(&app, "ada").await;

    let (status, body) = post(
        &app,
        "/api/session/action",
        json!({ "code": code, "action": { "type": "mine", "x": 0, "y": 1, "name": "ada" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["map"]["0,1"], "empty");
    assert_eq!(player(&body["state"], "ada")["inventory"]["dirt"], 1);

    let (_, body) = post(
        &app,
        "/api/session/action",
        json!({ "code": code, "action": { "type": "move", "direction": "down", "name": "ada" } }),
    )
    .await;
    assert_eq!(player(&body["state"], "ada")["y"], 1);

    let (_, body) = post(
        &app,
        "/api/session/action",
        json!({ "code": code, "action": { "type": "chat", "message": "dig!", "name": "ada" } }),
    )
    .await;
    let chat = &body["state"]["chat"][0];
    assert_eq!(chat["name"], "ada");
    assert_eq!(chat["message"], "dig!");
    assert!(chat["timestamp"].as_i64().unwrap() > 0);

    // Everything above was persisted
    let (_, body) = get(&app, &format!("/api/session/state?code={}", code)).await;
    assert_eq!(body["state"]["map"]["0,1"], "empty");
    assert_eq!(body["state"]["chat"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn action_errors() {
    let app = test_app();
    let code = create(&app, "ada").await;

    let (status, body) = post(&app, "/api/session/action", json!({ "code": code })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing code or action");

    let (status, body) = post(
        &app,
        "/api/session/action",
        json!({ "code": code, "action": { "type": "craft", "name": "ada" } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid action"));

    let (status, body) = post(
        &app,
        "/api/session/action",
        json!({ "code": code, "action": { "type": "mine", "x": 0, "y": 0, "name": "eve" } }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Player not found");

    let (status, _) = post(
        &app,
        "/api/session/action",
        json!({ "code": "NOPE", "action": { "type": "mine", "x": 0, "y": 0, "name": "ada" } }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sqlite_backed_router() {
    let store = SqliteStore::in_memory().await.unwrap();
    let state = AppState::new(Arc::new(store), Arc::new(EventLogger::disabled()));
    let app = build_router(Arc::new(state), cors_layer(Some("http://localhost:5173")));

    let code = create(&app, "ada").await;
    post(&app, "/api/session/join", json!({ "name": "bob", "code": code })).await;

    let (status, body) = get(&app, &format!("/api/session/state?code={}", code)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["players"].as_array().unwrap().len(), 2);
}

async fn preflight(app: &Router, origin: &str) -> axum::http::HeaderMap {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/session/create")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap().headers().clone()
}

#[tokio::test]
async fn cors_single_origin_allows_credentials() {
    let app = build_router(
        Arc::new(AppState::in_memory()),
        cors_layer(Some("http://localhost:5173")),
    );

    let headers = preflight(&app, "http://localhost:5173").await;
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/session/create")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": "ada" }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );

    let headers = preflight(&app, "http://evil.example").await;
    assert_ne!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://evil.example")
    );
}

#[tokio::test]
async fn cors_defaults_to_any_origin() {
    let app = test_app();

    let headers = preflight(&app, "http://anywhere.example").await;
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
}

#[tokio::test]
async fn long_chat_is_capped() {
    let app = test_app();
    let code = create(&app, "ada").await;

    let message = "a".repeat(400);
    let (status, body) = post(
        &app,
        "/api/session/action",
        json!({ "code": code, "action": { "type": "chat", "message": message, "name": "ada" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["chat"][0]["message"], "a".repeat(280));
}

#[tokio::test]
async fn serves_index_page() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
}
