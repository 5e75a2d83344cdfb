#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::TimeZone;
use http_body_util::BodyExt;
use tower::ServiceExt;

use gatepass_api::config::{LogFormat, ServerConfig};
use gatepass_api::router::build_app_router;
use gatepass_api::state::AppState;
use gatepass_core::access::User;
use gatepass_core::clock::ManualClock;
use gatepass_core::roles::{ROLE_GATEKEEPER, ROLE_MODERATOR, ROLE_STUDENT};
use gatepass_core::types::Timestamp;
use gatepass_db::{memory_pool, DbPool, Snapshot};

/// Fixed starting instant for every test clock.
pub fn t0() -> Timestamp {
    chrono::Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        database_file: "unused.json".into(),
        static_dir: None,
        log_format: LogFormat::Text,
    }
}

/// One user per well-known role.
pub fn seeded_snapshot() -> Snapshot {
    let user = |id: &str, username: &str, role: &str, name: &str| User {
        id: id.into(),
        username: username.into(),
        password: format!("{username}123"),
        role: role.into(),
        name: name.into(),
    };
    Snapshot {
        users: vec![
            user("1", "student1", ROLE_STUDENT, "Asha Kumar"),
            user("2", "moderator1", ROLE_MODERATOR, "Dr. Rao"),
            user("3", "gate1", ROLE_GATEKEEPER, "Main Gate"),
        ],
        passes: vec![],
    }
}

/// A router wired to an in-memory store and a manual clock.
pub struct TestApp {
    pub app: Router,
    pub pool: DbPool,
    pub clock: Arc<ManualClock>,
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(seeded_snapshot(), test_config())
}

/// Build the full application router with all middleware layers.
///
/// Uses the same [`build_app_router`] as `main.rs`, so integration tests
/// exercise the production middleware stack.
pub fn build_test_app_with(snapshot: Snapshot, config: ServerConfig) -> TestApp {
    let pool = memory_pool(snapshot);
    let clock = Arc::new(ManualClock::new(t0()));

    let state = AppState {
        pool: Arc::clone(&pool),
        config: Arc::new(config.clone()),
        clock: clock.clone(),
    };

    TestApp {
        app: build_app_router(state, &config),
        pool,
        clock,
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as UTF-8 text.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

/// PUT with no body, as the gate scanner sends.
pub async fn put_empty(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn send_json(app: &Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// The standard pass request body used across tests: due back one hour
/// after [`t0`].
pub fn pass_request(student_id: &str) -> serde_json::Value {
    serde_json::json!({
        "studentId": student_id,
        "studentName": "Asha Kumar",
        "reason": "Dentist appointment",
        "destination": "City clinic",
        "expectedReturn": "2026-10-18T10:00:00Z",
    })
}

/// Create a pass through the API and return its JSON.
pub async fn create_pass(app: &Router, student_id: &str) -> serde_json::Value {
    let response = post_json(app, "/api/passes", pass_request(student_id)).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await["pass"].clone()
}

/// Decide a pass through the API and return the response JSON.
pub async fn decide(app: &Router, pass_id: &str, status: &str) -> serde_json::Value {
    let body = serde_json::json!({
        "status": status,
        "remarks": "Looks fine",
        "moderatorName": "Dr. Rao",
    });
    let response = put_json(app, &format!("/api/passes/{pass_id}/status"), body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}

/// Ids of the passes in a `{ passes: [...] }` body.
pub fn pass_ids(json: &serde_json::Value) -> Vec<String> {
    json["passes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}
