//! Route definitions for the `/commands` resource.
//!
//! All endpoints require authentication; issuance additionally requires a
//! commanding role.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::commands;
use crate::state::AppState;

/// Routes mounted at `/commands`.
///
/// ```text
/// POST   /             -> issue_command (supervisor/admin)
/// GET    /pending      -> get_pending
/// POST   /acknowledge  -> acknowledge
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(commands::issue_command))
        .route("/pending", get(commands::get_pending))
        .route("/acknowledge", post(commands::acknowledge))
}
