//! Shorten API integration tests
//!
//! These tests drive `POST /shorten` through the full router against both the
//! in-memory and the SQLite storage.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use brevity::shortcode::{GenerateCode, CODE_LENGTH};
use brevity::state::AppState;
use brevity::storage::{MemoryStorage, SqliteStorage, Storage};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const BASE_URL: &str = "http://localhost:8080/";

async fn create_sqlite_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

fn create_app(storage: Arc<dyn Storage>) -> Router {
    brevity::build_router(Arc::new(AppState::new(storage, BASE_URL)))
}

fn shorten_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/shorten")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn code_of(json: &Value) -> String {
    let short_url = json["shortURL"].as_str().unwrap();
    short_url
        .strip_prefix(BASE_URL)
        .unwrap_or_else(|| panic!("unexpected short URL {short_url}"))
        .to_string()
}

async fn assert_shorten_is_idempotent(storage: Arc<dyn Storage>) {
    let app = create_app(storage.clone());

    let (status, first) = send(&app, shorten_request(r#"{"url": "https://example.com/a"}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["originalURL"], "https://example.com/a");
    let code = code_of(&first);
    assert_eq!(code.len(), CODE_LENGTH);

    let (status, second) =
        send(&app, shorten_request(r#"{"url": "https://example.com/a"}"#)).await;
    assert_eq!(status, StatusCode::OK, "existing URL should answer 200");
    assert_eq!(code_of(&second), code);
    assert_eq!(storage.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_shorten_is_idempotent_memory() {
    assert_shorten_is_idempotent(Arc::new(MemoryStorage::new())).await;
}

#[tokio::test]
async fn test_shorten_is_idempotent_sqlite() {
    assert_shorten_is_idempotent(create_sqlite_storage().await).await;
}

#[tokio::test]
async fn test_distinct_urls_get_distinct_codes() {
    let app = create_app(Arc::new(MemoryStorage::new()));

    let mut codes = std::collections::HashSet::new();
    for i in 0..200 {
        let (status, json) = send(
            &app,
            shorten_request(&format!(r#"{{"url": "https://example.com/{i}"}}"#)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(codes.insert(code_of(&json)), "duplicate code handed out");
    }
}

#[tokio::test]
async fn test_invalid_urls_are_rejected_and_not_stored() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = create_app(storage.clone());

    for url in ["example.com", "/path/only", "http://", "mailto:a@b.c", ""] {
        let (status, json) = send(
            &app,
            shorten_request(&serde_json::json!({ "url": url }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "url {url:?} accepted");
        assert_eq!(json["error"], "Invalid URL provided");
    }

    assert_eq!(storage.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_bad_json_is_rejected() {
    let app = create_app(Arc::new(MemoryStorage::new()));

    for body in ["not json", r#"{"link": "https://example.com"}"#, r#"{"url": 42}"#] {
        let (status, json) = send(&app, shorten_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?} accepted");
        assert_eq!(json["error"], "Invalid JSON payload");
    }

    // Missing content type is a client error too
    let request = Request::builder()
        .method("POST")
        .uri("/shorten")
        .body(Body::from(r#"{"url": "https://example.com"}"#))
        .unwrap();
    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid JSON payload");
}

#[tokio::test]
async fn test_url_is_trimmed_before_storing() {
    let app = create_app(Arc::new(MemoryStorage::new()));

    let (status, first) =
        send(&app, shorten_request(r#"{"url": "  https://example.com/t  "}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["originalURL"], "https://example.com/t");

    let (status, second) =
        send(&app, shorten_request(r#"{"url": "https://example.com/t"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(code_of(&first), code_of(&second));
}

/// Always hands out the same code
struct StuckGenerator(&'static str);

impl GenerateCode for StuckGenerator {
    fn generate_code(&self) -> String {
        self.0.to_string()
    }
}

#[tokio::test]
async fn test_exhausted_allocation_is_a_server_error() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    storage.insert("https://taken.example", "stuck").await.unwrap();

    let state = AppState::new(storage.clone(), BASE_URL)
        .with_generator(Arc::new(StuckGenerator("stuck")), 4);
    let app = brevity::build_router(Arc::new(state));

    let (status, json) = send(&app, shorten_request(r#"{"url": "https://new.example"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to generate short URL code");
    assert_eq!(storage.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_health_reports_link_count() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = create_app(storage.clone());
    send(&app, shorten_request(r#"{"url": "https://example.com"}"#)).await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["links"], 1);
}
