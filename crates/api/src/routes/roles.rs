//! Route definitions for the `/admin/roles` resource (admin only).

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::roles;
use crate::state::AppState;

/// Routes mounted at `/admin/roles`.
///
/// ```text
/// POST   /         -> assign_role (admin only)
/// DELETE /{email}  -> remove_role (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(roles::assign_role))
        .route("/{email}", delete(roles::remove_role))
}
