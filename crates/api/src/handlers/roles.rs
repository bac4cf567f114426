//! Handlers for the `/admin/roles` resource (admin only).
//!
//! The external directory is the system of record: every mutation calls it
//! first and only touches the local account row after the directory
//! confirms, so a directory failure (502) leaves local state unchanged.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use vigil_core::error::CoreError;
use vigil_core::roles::Role;
use vigil_core::types::DbId;
use vigil_db::models::account::{Account, UpsertAccount};
use vigil_db::repositories::account_repo::AccountRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/roles`.
#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub email: String,
    pub role: Role,
    /// Display name; defaults to the email local part when omitted.
    pub display_name: Option<String>,
    /// Supervising account's email. Employees only.
    pub supervisor_email: Option<String>,
}

/// Resolve a `supervisor_email` into a supervisor account id.
async fn resolve_supervisor(state: &AppState, email: &str) -> AppResult<DbId> {
    let supervisor = AccountRepo::find_by_email(&state.pool, email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Account", email)))?;
    if supervisor.role()? != Role::Supervisor {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{email} is not a supervisor"
        ))));
    }
    Ok(supervisor.id)
}

/// POST /api/v1/admin/roles
///
/// Assign (or re-assign) a role. Mirrors the grant to the external
/// directory, then upserts the local account keyed by the directory's
/// identity; a soft-deleted account re-assigned here is revived.
pub async fn assign_role(
    RequireAdmin(_caller): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<AssignRoleRequest>,
) -> AppResult<Json<DataResponse<Account>>> {
    let email = req.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "A valid email is required".into(),
        )));
    }

    let supervisor_id = match (&req.supervisor_email, req.role) {
        (Some(sup_email), Role::Employee) => Some(resolve_supervisor(&state, sup_email).await?),
        (Some(_), _) => {
            return Err(AppError::Core(CoreError::Validation(
                "Only employees can have a supervisor".into(),
            )));
        }
        (None, _) => None,
    };

    // Directory first. A refusal or outage surfaces as 502 and the local
    // account row is never touched.
    let external_id = state.directory.assign_role(&email, req.role).await?;

    let display_name = req
        .display_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or(&email).to_string());

    let account = AccountRepo::upsert(
        &state.pool,
        &UpsertAccount {
            external_id,
            email,
            display_name,
            role: req.role,
            supervisor_id,
        },
    )
    .await?;

    tracing::info!(
        account_id = account.id,
        role = %account.role,
        "Role assigned"
    );
    Ok(Json(DataResponse { data: account }))
}

/// DELETE /api/v1/admin/roles/{email}
///
/// Revoke all roles for an account. The directory revocation happens first;
/// on success the local account is soft-deleted, which hides it from every
/// lookup while retaining its history for audit.
pub async fn remove_role(
    RequireAdmin(_caller): RequireAdmin,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let account = AccountRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Account", &email)))?;

    state.directory.remove_role(&account.external_id).await?;

    AccountRepo::soft_delete(&state.pool, account.id).await?;

    tracing::info!(account_id = account.id, "Role removed, account deactivated");
    Ok(Json(DataResponse {
        data: serde_json::json!({ "message": "Role removed" }),
    }))
}
