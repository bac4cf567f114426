//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the real application router (same middleware stack as `main.rs`)
//! over a `#[sqlx::test]` pool, with the local directory stand-in and the
//! real WebSocket group broadcaster so tests can attach fake sessions and
//! observe deliveries.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use vigil_api::auth::jwt::{issue_token, JwtConfig};
use vigil_api::config::ServerConfig;
use vigil_api::directory::{DirectoryClient, DirectoryError, LocalDirectory};
use vigil_api::router::build_router;
use vigil_api::state::AppState;
use vigil_api::ws::GroupBroadcaster;
use vigil_core::roles::Role;
use vigil_core::types::DbId;
use vigil_db::models::account::{Account, UpsertAccount};
use vigil_db::repositories::account_repo::AccountRepo;

/// Signing secret shared by [`test_config`] and [`auth_token`].
pub const TEST_JWT_SECRET: &str = "integration-test-secret-for-hmac-sha256";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        sweep_interval_secs: 60,
        directory_url: None,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            token_expiry_mins: 60,
        },
    }
}

/// Build the full application router plus a handle to its group
/// broadcaster, so tests can register fake WebSocket sessions and read
/// what delivery pushed to them.
pub fn build_test_app(pool: PgPool) -> (Router, Arc<GroupBroadcaster>) {
    build_test_app_with_directory(pool, Arc::new(LocalDirectory))
}

/// Same as [`build_test_app`] but with a caller-chosen directory client.
pub fn build_test_app_with_directory(
    pool: PgPool,
    directory: Arc<dyn DirectoryClient>,
) -> (Router, Arc<GroupBroadcaster>) {
    let broadcaster = Arc::new(GroupBroadcaster::new());
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        broadcaster: Arc::clone(&broadcaster),
        directory,
    };
    (build_router(state), broadcaster)
}

/// Directory stand-in that refuses every call, for exercising the 502 path.
pub struct FailingDirectory;

#[async_trait]
impl DirectoryClient for FailingDirectory {
    async fn assign_role(&self, _email: &str, _role: Role) -> Result<String, DirectoryError> {
        Err(DirectoryError::Api {
            status: 503,
            body: "directory down".to_string(),
        })
    }

    async fn remove_role(&self, _external_id: &str) -> Result<(), DirectoryError> {
        Err(DirectoryError::Api {
            status: 503,
            body: "directory down".to_string(),
        })
    }
}

/// Mint a bearer token the way the directory would.
pub fn auth_token(external_id: &str, email: &str, role: &str) -> String {
    let config = test_config();
    issue_token(external_id, email, role, &config.jwt).expect("token minting should succeed")
}

/// Insert a live account row directly, bypassing the role endpoint.
pub async fn seed_account(
    pool: &PgPool,
    external_id: &str,
    email: &str,
    role: Role,
    supervisor_id: Option<DbId>,
) -> Account {
    AccountRepo::upsert(
        pool,
        &UpsertAccount {
            external_id: external_id.to_string(),
            email: email.to_string(),
            display_name: external_id.to_string(),
            role,
            supervisor_id,
        },
    )
    .await
    .expect("seeding account should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers (tower::ServiceExt::oneshot, no TCP listener)
// ---------------------------------------------------------------------------

/// Send a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Send a POST request with a JSON body and no authentication.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Send a DELETE request with a bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
