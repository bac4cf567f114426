//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role is not
//! permitted the guarded operation. The actual decision is
//! [`vigil_core::roles::is_allowed`], so route guards and the policy table
//! cannot drift apart.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vigil_core::error::CoreError;
use vigil_core::roles::{is_allowed, Operation};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role (role management). Rejects with 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(caller): RequireAdmin) -> AppResult<Json<()>> {
///     // caller is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = AuthUser::from_request_parts(parts, state).await?;
        if !is_allowed(caller.role, Operation::ManageRoles) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(caller))
    }
}

/// Requires a role allowed to issue commands (`supervisor` or `admin`).
///
/// ```ignore
/// async fn issue(RequireCommander(caller): RequireCommander) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireCommander(pub AuthUser);

impl FromRequestParts<AppState> for RequireCommander {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = AuthUser::from_request_parts(parts, state).await?;
        if !is_allowed(caller.role, Operation::IssueCommand) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Supervisor or Admin role required".into(),
            )));
        }
        Ok(RequireCommander(caller))
    }
}
