//! Handlers for the `/presence` resource.
//!
//! All endpoints require authentication via [`AuthUser`] and operate on the
//! caller's own account.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use vigil_core::error::CoreError;
use vigil_core::presence::PresenceStatus;
use vigil_core::types::Timestamp;
use vigil_db::models::account::Account;
use vigil_db::repositories::account_repo::AccountRepo;
use vigil_db::repositories::presence_repo::PresenceRepo;

use crate::dispatch;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /presence/status`.
#[derive(Debug, Deserialize)]
pub struct ReportStatusRequest {
    pub status: PresenceStatus,
}

/// Response body for `GET /presence/status`.
#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    pub status: PresenceStatus,
    /// `null` until the account has reported status at least once.
    pub last_seen_at: Option<Timestamp>,
}

/// Resolve the caller's live account row, 404 when it does not exist
/// (e.g. the role was removed while the token was still valid).
async fn resolve_caller(state: &AppState, caller: &AuthUser) -> AppResult<Account> {
    AccountRepo::find_by_external_id(&state.pool, &caller.external_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Account", &caller.external_id)))
}

/// POST /api/v1/presence/status
///
/// Record the caller's online/offline transition. Going online also flushes
/// any queued commands for the caller; delivery failures there are absorbed
/// by the dispatcher and never fail this request.
pub async fn report_status(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ReportStatusRequest>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let account = resolve_caller(&state, &caller).await?;

    match req.status {
        PresenceStatus::Online => {
            PresenceRepo::set_online(&state.pool, account.id).await?;
            let delivered =
                dispatch::deliver_pending(&state.pool, state.broadcaster.as_ref(), &account)
                    .await?;
            tracing::info!(
                account_id = account.id,
                delivered,
                "Account online, backlog flushed"
            );
        }
        PresenceStatus::Offline => {
            PresenceRepo::set_offline(&state.pool, account.id).await?;
            tracing::info!(account_id = account.id, "Account offline");
        }
    }

    Ok(Json(DataResponse {
        data: serde_json::json!({ "message": "Status updated" }),
    }))
}

/// GET /api/v1/presence/status
///
/// Return the caller's current presence. An account that has never reported
/// is offline with no `last_seen_at`.
pub async fn get_status(
    caller: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PresenceResponse>>> {
    let account = resolve_caller(&state, &caller).await?;

    let state_row = PresenceRepo::get_state(&state.pool, account.id).await?;
    let response = match state_row {
        Some(row) => PresenceResponse {
            status: if row.status == "online" {
                PresenceStatus::Online
            } else {
                PresenceStatus::Offline
            },
            last_seen_at: Some(row.last_seen_at),
        },
        None => PresenceResponse {
            status: PresenceStatus::Offline,
            last_seen_at: None,
        },
    };

    Ok(Json(DataResponse { data: response }))
}
