//! Account entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use vigil_core::error::CoreError;
use vigil_core::roles::Role;
use vigil_core::types::{DbId, Timestamp};

/// Full account row from the `accounts` table.
///
/// Soft-deleted rows (`deleted_at` set) are never returned by
/// [`crate::repositories::AccountRepo`] lookups; they exist only for audit
/// retention and for an external hard-delete collaborator.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: DbId,
    /// Stable identity in the external directory.
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    /// Role name as stored (`admin` / `supervisor` / `employee`).
    pub role: String,
    /// Supervising account, set only for employees.
    pub supervisor_id: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Account {
    /// Parse the stored role name into the closed [`Role`] enum.
    ///
    /// A row with an unknown role name is corrupt; surfaced as
    /// [`CoreError::Internal`] rather than a validation error because the
    /// caller sent nothing wrong.
    pub fn role(&self) -> Result<Role, CoreError> {
        Role::from_str(&self.role)
            .map_err(|_| CoreError::Internal(format!("Account {} has invalid role", self.id)))
    }
}

/// DTO for creating (or re-activating) an account on role assignment.
#[derive(Debug, Deserialize)]
pub struct UpsertAccount {
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub supervisor_id: Option<DbId>,
}
