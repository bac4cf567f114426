//! Handlers for the `/commands` resource.
//!
//! Issuance is restricted to supervisors and admins; a supervisor may only
//! target employees they supervise. Acknowledgment and the pending lookup
//! operate on the caller's own queue.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use vigil_core::command::CommandKind;
use vigil_core::error::CoreError;
use vigil_core::roles::Role;
use vigil_core::types::{DbId, Timestamp};
use vigil_db::models::command::PendingCommand;
use vigil_db::repositories::account_repo::AccountRepo;
use vigil_db::repositories::command_repo::CommandRepo;

use crate::dispatch;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireCommander;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /commands`.
#[derive(Debug, Deserialize)]
pub struct IssueCommandRequest {
    pub command: CommandKind,
    /// Email of the target employee.
    pub target_email: String,
    /// Issuance time; defaults to the server clock when omitted.
    pub issued_at: Option<Timestamp>,
    /// Optional delivery deadline; expired commands are never broadcast.
    pub expires_at: Option<Timestamp>,
}

/// Response body for `POST /commands`.
#[derive(Debug, Serialize)]
pub struct IssueCommandResponse {
    pub id: DbId,
    pub message: &'static str,
}

/// Response body for `GET /commands/pending`.
#[derive(Debug, Serialize)]
pub struct PendingResponse {
    /// Most recently created unacknowledged command, or `null`.
    pub pending: Option<PendingCommand>,
}

/// Request body for `POST /commands/acknowledge`.
#[derive(Debug, Deserialize)]
pub struct AcknowledgeRequest {
    pub ids: Vec<DbId>,
}

/// Response body for `POST /commands/acknowledge`.
#[derive(Debug, Serialize)]
pub struct AcknowledgeResponse {
    pub updated_count: u64,
}

/// POST /api/v1/commands
///
/// Queue a camera command for an employee, then attempt immediate delivery.
/// The command is durably stored before any delivery attempt; an offline
/// target or a failed broadcast still returns success here.
pub async fn issue_command(
    RequireCommander(caller): RequireCommander,
    State(state): State<AppState>,
    Json(req): Json<IssueCommandRequest>,
) -> AppResult<Json<DataResponse<IssueCommandResponse>>> {
    let target = AccountRepo::find_by_email(&state.pool, &req.target_email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Account", &req.target_email)))?;

    if target.role()? != Role::Employee {
        return Err(AppError::Core(CoreError::Validation(
            "Commands can only target employees".into(),
        )));
    }

    // Supervisors may only command their own employees. Admins may command
    // any employee.
    if caller.role == Role::Supervisor {
        let caller_account = AccountRepo::find_by_external_id(&state.pool, &caller.external_id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::not_found("Account", &caller.external_id)))?;
        if target.supervisor_id != Some(caller_account.id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "You can only issue commands to your own employees".into(),
            )));
        }
    }

    let issued_at = req.issued_at.unwrap_or_else(Utc::now);
    let command = CommandRepo::create(
        &state.pool,
        target.id,
        req.command,
        issued_at,
        req.expires_at,
    )
    .await?;

    // Immediate delivery attempt. Offline target or broadcast failure is
    // fine: the row stays queued for the reconnect flush and the sweep.
    dispatch::try_deliver(&state.pool, state.broadcaster.as_ref(), &target, &command).await?;

    Ok(Json(DataResponse {
        data: IssueCommandResponse {
            id: command.id,
            message: "Command queued",
        },
    }))
}

/// GET /api/v1/commands/pending
///
/// Return the caller's most recently created unacknowledged command, or
/// `null` if the queue is clear. HTTP fallback for clients whose WebSocket
/// session missed a push.
pub async fn get_pending(
    caller: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PendingResponse>>> {
    let account = AccountRepo::find_by_external_id(&state.pool, &caller.external_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Account", &caller.external_id)))?;

    let pending = CommandRepo::latest_unacknowledged(&state.pool, account.id).await?;

    Ok(Json(DataResponse {
        data: PendingResponse { pending },
    }))
}

/// POST /api/v1/commands/acknowledge
///
/// Bulk-acknowledge delivered commands by id, scoped to the caller's own
/// queue. Idempotent: re-acknowledging ids, or sending ids that do not
/// exist or belong to someone else, is not an error -- those ids simply
/// match nothing. Returns how many rows matched.
pub async fn acknowledge(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AcknowledgeRequest>,
) -> AppResult<Json<DataResponse<AcknowledgeResponse>>> {
    let account = AccountRepo::find_by_external_id(&state.pool, &caller.external_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Account", &caller.external_id)))?;

    let updated_count = CommandRepo::acknowledge(&state.pool, account.id, &req.ids).await?;

    Ok(Json(DataResponse {
        data: AcknowledgeResponse { updated_count },
    }))
}
