#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use resume_api::config::Config;
use resume_api::routes::build_router;
use resume_api::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/unused".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        port: 0,
        db_max_connections: 2,
        rust_log: "debug".to_string(),
    }
}

/// Router over a real (test) database.
pub fn build_test_app(pool: PgPool) -> Router {
    build_router(AppState::new(pool, test_config()))
}

/// Router whose pool never connects. Only usable for requests that are
/// rejected before any query runs.
pub fn build_offline_app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .expect("lazy pool should build without connecting");
    build_test_app(pool)
}

/// Sends one request and returns the status plus the parsed JSON body
/// (`Value::Null` when the body is empty or not JSON).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Registers a user through the API and returns `(token, user_id)`.
pub async fn register(app: &Router, username: &str) -> (String, Uuid) {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@test.com"),
            "password": "test_password_123!",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {json}");
    let token = json["token"].as_str().unwrap().to_string();
    let id = json["user"]["id"].as_str().unwrap().parse().unwrap();
    (token, id)
}

/// Creates a resume and returns its id.
pub async fn create_resume(app: &Router, token: Option<&str>, title: &str) -> Uuid {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/resumes",
        token,
        Some(json!({ "title": title, "full_name": "Test Person" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    json["id"].as_str().unwrap().parse().unwrap()
}
