#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use centace_api::auth::jwt::{sign_access_token, JwtConfig};
use centace_api::auth::password::hash_password;
use centace_api::config::ServerConfig;
use centace_api::router::build_app_router;
use centace_api::state::AppState;
use centace_api::ws::WsManager;
use centace_core::funding::FundingLimits;
use centace_core::roles::{ROLE_ADMIN, ROLE_INVESTOR};
use centace_core::types::DbId;
use centace_db::models::project::{CreateProject, Project};
use centace_db::models::user::{CreateUser, User};
use centace_db::repositories::{ProjectRepo, UserRepo};
use centace_events::EventBus;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        session_cleanup_interval_secs: 3600,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        funding_limits: FundingLimits::default(),
    }
}

/// Build the full application router on `pool`, using the same builder and
/// middleware stack as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool, Arc::new(EventBus::default()))
}

/// Like [`build_test_app`], but with a caller-owned bus so tests can
/// subscribe and observe published events.
pub fn build_test_app_with_bus(pool: PgPool, event_bus: Arc<EventBus>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] directly in the database.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Sign an access token without going through the login endpoint.
pub fn token_for(user_id: DbId, role: &str) -> String {
    sign_access_token(user_id, role, &test_config().jwt).expect("token should sign")
}

/// Create an investor and return `(user_id, access_token)`.
pub async fn investor(pool: &PgPool, username: &str) -> (DbId, String) {
    let user = create_user(pool, username, ROLE_INVESTOR).await;
    (user.id, token_for(user.id, ROLE_INVESTOR))
}

/// Create an admin and return `(user_id, access_token)`.
pub async fn admin(pool: &PgPool, username: &str) -> (DbId, String) {
    let user = create_user(pool, username, ROLE_ADMIN).await;
    (user.id, token_for(user.id, ROLE_ADMIN))
}

/// Insert an active project priced at `price` with `available` of 100 shares left.
pub async fn create_project(pool: &PgPool, name: &str, price: Decimal, available: i32) -> Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
            description: Some("Test project".to_string()),
            category: "agriculture".to_string(),
            price_per_share: price,
            total_shares: 100,
            available_shares: Some(available),
            status: Some("active".to_string()),
            tier: Some("gold".to_string()),
            location: "Nairobi".to_string(),
            expected_return_pct: None,
            duration_months: Some(12),
            funding_deadline: None,
        },
    )
    .await
    .expect("project creation should succeed")
}
