//! Pending command row model.

use serde::Serialize;
use sqlx::FromRow;
use std::str::FromStr;
use vigil_core::command::CommandKind;
use vigil_core::error::CoreError;
use vigil_core::types::{DbId, Timestamp};

/// A queued START/STOP directive (`pending_commands` table).
///
/// Lifecycle: created with `published = false, attempt_count = 0`; marked
/// published (attempt_count incremented) on each successful broadcast;
/// marked acknowledged on client confirmation. Never deleted by this
/// service -- `expires_at` is advisory data for an external cleanup job.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingCommand {
    pub id: DbId,
    pub target_account_id: DbId,
    /// `START` or `STOP`.
    pub command: String,
    /// Caller-supplied issuance time; also the payload timestamp.
    pub issued_at: Timestamp,
    pub published: bool,
    pub published_at: Option<Timestamp>,
    pub acknowledged: bool,
    pub acknowledged_at: Option<Timestamp>,
    /// Successful broadcast attempts. At-least-once counter, not an
    /// exactly-once guard.
    pub attempt_count: i32,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl PendingCommand {
    /// Parse the stored command into the closed [`CommandKind`] enum.
    pub fn kind(&self) -> Result<CommandKind, CoreError> {
        CommandKind::from_str(&self.command)
            .map_err(|_| CoreError::Internal(format!("Command {} has invalid kind", self.id)))
    }
}
