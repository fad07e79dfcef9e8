//! Integration tests for API endpoints.
//!
//! The router runs over the in-memory store (or a failing fake), so no
//! database is needed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_api::api::{create_router, AppState};
use auth_api::domain::User;
use auth_api::infra::{StoreError, StoreResult, UserRepository};

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Test Helpers
// =============================================================================

fn app() -> Router {
    create_router(AppState::in_memory(), TEST_TIMEOUT)
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

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn register_alice(app: &Router) -> (StatusCode, Value) {
    post_json(
        app,
        "/api/auth/register",
        json!({"username": "alice", "email": "a@x.com", "password": "p1"}),
    )
    .await
}

/// Store whose every call fails
struct BrokenStore;

#[async_trait]
impl UserRepository for BrokenStore {
    async fn create_user(&self, _user: User) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn get_user_by_username(&self, _username: &str) -> StoreResult<Option<User>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Store that never answers within the request timeout
struct StalledStore;

#[async_trait]
impl UserRepository for StalledStore {
    async fn create_user(&self, _user: User) -> StoreResult<()> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }

    async fn get_user_by_username(&self, _username: &str) -> StoreResult<Option<User>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }
}

// =============================================================================
// Register / Login Scenario
// =============================================================================

#[tokio::test]
async fn test_register_login_scenario() {
    let app = app();

    let (status, body) = register_alice(&app).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "a@x.com");

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        json!({"username": "alice", "password": "p1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        json!({"username": "alice", "password": "wrong"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_user_body_never_contains_password() {
    let app = app();

    let (_, registered) = register_alice(&app).await;
    let (_, logged_in) = post_json(
        &app,
        "/api/auth/login",
        json!({"username": "alice", "password": "p1"}),
    )
    .await;

    assert!(registered.get("password").is_none());
    assert!(logged_in.get("password").is_none());
}

#[tokio::test]
async fn test_login_failures_have_identical_bodies() {
    let app = app();
    register_alice(&app).await;

    let wrong_password = post_json(
        &app,
        "/api/auth/login",
        json!({"username": "alice", "password": "wrong"}),
    )
    .await;
    let unknown_user = post_json(
        &app,
        "/api/auth/login",
        json!({"username": "nonexistent", "password": "p1"}),
    )
    .await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(unknown_user.1["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_duplicate_registration_is_bad_request() {
    let app = app();
    register_alice(&app).await;

    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        json!({"username": "alice", "email": "other@x.com", "password": "p2"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "REGISTRATION_FAILED");
    assert_eq!(
        body["error"]["message"],
        "Registration failed: Username is already taken"
    );

    // The original account is untouched
    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        json!({"username": "alice", "password": "p1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Boundary Validation
// =============================================================================

#[tokio::test]
async fn test_register_empty_username_rejected() {
    let app = app();

    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        json!({"username": "", "email": "a@x.com", "password": "p1"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Username is required");
}

#[tokio::test]
async fn test_register_invalid_email_rejected() {
    let app = app();

    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        json!({"username": "alice", "email": "not-an-email", "password": "p1"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid email format");
}

#[tokio::test]
async fn test_register_missing_field_rejected() {
    let app = app();

    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        json!({"username": "alice", "password": "p1"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_malformed_json_rejected() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Store Failures
// =============================================================================

#[tokio::test]
async fn test_register_store_failure_is_bad_request() {
    let app = create_router(AppState::from_store(Arc::new(BrokenStore)), TEST_TIMEOUT);

    let (status, body) = register_alice(&app).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Registration failed: Unable to store user");
}

#[tokio::test]
async fn test_login_store_failure_is_server_error() {
    let app = create_router(AppState::from_store(Arc::new(BrokenStore)), TEST_TIMEOUT);

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        json!({"username": "alice", "password": "p1"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "STORAGE_ERROR");
    assert!(!body.to_string().contains("connection refused"));
}

#[tokio::test]
async fn test_stalled_store_times_out() {
    let app = create_router(
        AppState::from_store(Arc::new(StalledStore)),
        Duration::from_millis(100),
    );

    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        json!({"username": "alice", "password": "p1"}),
    )
    .await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
}

// =============================================================================
// Health & CORS
// =============================================================================

#[tokio::test]
async fn test_health_reports_healthy_store() {
    let app = app();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["store"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_reports_degraded_store() {
    let app = create_router(AppState::from_store(Arc::new(BrokenStore)), TEST_TIMEOUT);
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["store"]["error"], "Store unreachable");
    assert!(!body.to_string().contains("connection refused"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::ORIGIN, "https://localhost:5173")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"username": "a", "password": "b"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_openapi_document_lists_auth_paths() {
    let app = app();
    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/auth/register").is_some());
    assert!(body["paths"].get("/api/auth/login").is_some());
}
