//! Common test utilities for integration tests.
//!
//! Tests run against the full router wired to the in-memory store, so
//! no external services are needed.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use clubhouse_api::app::{create_app, AppState};
use clubhouse_api::config::{
    AuthConfig, CacheConfig, Config, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig,
};
use persistence::entities::UserProfileRecord;
use persistence::keys;
use persistence::store::{MemoryStore, StoreRecord, WriteOp};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

/// Configuration for tests: in-memory-friendly defaults and a fixed
/// JWT secret for token generation.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused-in-tests".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 1,
            idle_timeout_secs: 1,
        },
        logging: LoggingConfig::default(),
        security: SecurityConfig::default(),
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            access_token_expiry_secs: 900,
            leeway_secs: 30,
        },
        cache: CacheConfig::default(),
    }
}

/// Application state over a fresh in-memory store.
pub fn create_test_state() -> AppState {
    AppState::new(test_config(), Arc::new(MemoryStore::new()))
}

/// Router over the given state.
pub fn create_test_app(state: &AppState) -> Router {
    create_app(state.clone())
}

/// A test user with a signed access token.
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn new(state: &AppState) -> Self {
        Self::with_role(state, "user")
    }

    pub fn admin(state: &AppState) -> Self {
        Self::with_role(state, "admin")
    }

    fn with_role(state: &AppState, role: &str) -> Self {
        let id = Uuid::new_v4();
        let token = state
            .jwt
            .generate_access_token(id, role)
            .expect("Failed to generate test token");
        Self { id, token }
    }
}

/// Seeds a profile record the way the external user service would.
pub async fn seed_profile(state: &AppState, user_id: Uuid, display_name: &str, email: &str) {
    let record = UserProfileRecord::new(user_id, display_name, email, None);
    state
        .store
        .atomic_write(vec![WriteOp::put(StoreRecord::new(
            keys::user_profile_key(user_id),
            serde_json::to_value(&record).expect("Failed to encode profile"),
        ))])
        .await
        .expect("Failed to seed profile");
}

/// Sends one request through the router.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    app.clone()
        .oneshot(request)
        .await
        .expect("Request failed")
}

/// Reads a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body was not JSON")
}

/// Creates a club through the API and returns its id.
pub async fn create_club(app: &Router, owner: &TestUser, name: &str) -> Uuid {
    let response = send(
        app,
        Method::POST,
        "/api/v1/clubs",
        Some(&owner.token),
        Some(serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("Club response had no id")
}
