//! Route definitions for the `/presence` resource.
//!
//! All endpoints require authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::presence;
use crate::state::AppState;

/// Routes mounted at `/presence`.
///
/// ```text
/// POST   /status   -> report_status
/// GET    /status   -> get_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/status",
        get(presence::get_status).post(presence::report_status),
    )
}
