pub mod commands;
pub mod health;
pub mod presence;
pub mod roles;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                            WebSocket (joins the caller's group)
///
/// /presence/status               report status (POST), read own status (GET)
///
/// /commands                      issue command (POST, supervisor/admin)
/// /commands/pending              latest unacknowledged command (GET)
/// /commands/acknowledge          bulk acknowledge (POST)
///
/// /admin/roles                   assign role (POST, admin only)
/// /admin/roles/{email}           remove role (DELETE, admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/presence", presence::router())
        .nest("/commands", commands::router())
        .nest("/admin/roles", roles::router())
}
