//! Repository for the `pending_commands` table.

use sqlx::PgPool;
use vigil_core::command::CommandKind;
use vigil_core::types::{DbId, Timestamp};

use crate::models::command::PendingCommand;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, target_account_id, command, issued_at, published, published_at, \
                        acknowledged, acknowledged_at, attempt_count, expires_at, created_at";

/// Persists and tracks queued commands. Delivery itself (presence gating,
/// broadcast) lives in the api crate's dispatcher; this layer only stores
/// state transitions.
pub struct CommandRepo;

impl CommandRepo {
    /// Persist a new command. Pure creation, no delivery side effect:
    /// the row starts `published = false, acknowledged = false,
    /// attempt_count = 0`.
    pub async fn create(
        pool: &PgPool,
        target_account_id: DbId,
        kind: CommandKind,
        issued_at: Timestamp,
        expires_at: Option<Timestamp>,
    ) -> Result<PendingCommand, sqlx::Error> {
        let query = format!(
            "INSERT INTO pending_commands (target_account_id, command, issued_at, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PendingCommand>(&query)
            .bind(target_account_id)
            .bind(kind.as_str())
            .bind(issued_at)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a command by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PendingCommand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pending_commands WHERE id = $1");
        sqlx::query_as::<_, PendingCommand>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record a successful broadcast: `published = true`, `published_at`
    /// stamped, `attempt_count` incremented. Called only after the
    /// broadcast send returned success, so a failed send never touches the
    /// row.
    pub async fn mark_published(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PendingCommand>, sqlx::Error> {
        let query = format!(
            "UPDATE pending_commands SET
                published = true,
                published_at = NOW(),
                attempt_count = attempt_count + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PendingCommand>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Unacknowledged commands for an account, oldest-created first.
    pub async fn list_unacknowledged(
        pool: &PgPool,
        target_account_id: DbId,
    ) -> Result<Vec<PendingCommand>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pending_commands
             WHERE target_account_id = $1 AND acknowledged = false
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, PendingCommand>(&query)
            .bind(target_account_id)
            .fetch_all(pool)
            .await
    }

    /// The most recently created unacknowledged command, if any.
    pub async fn latest_unacknowledged(
        pool: &PgPool,
        target_account_id: DbId,
    ) -> Result<Option<PendingCommand>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pending_commands
             WHERE target_account_id = $1 AND acknowledged = false
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, PendingCommand>(&query)
            .bind(target_account_id)
            .fetch_optional(pool)
            .await
    }

    /// Bulk-acknowledge by ID, scoped to one target account. Returns the
    /// number of matching rows. Ids belonging to another account match
    /// nothing.
    ///
    /// Deliberately unconditional on the acknowledged flag itself:
    /// re-acknowledging an already-acknowledged row refreshes its
    /// `acknowledged_at`, which keeps the call idempotent in effect without
    /// a second round trip to filter.
    pub async fn acknowledge(
        pool: &PgPool,
        target_account_id: DbId,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE pending_commands SET
                acknowledged = true,
                acknowledged_at = NOW()
             WHERE id = ANY($1) AND target_account_id = $2",
        )
        .bind(ids)
        .bind(target_account_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Records eligible for a delivery attempt: unpublished and unexpired.
    /// Oldest first, so retries preserve issuance order per account.
    ///
    /// This is exactly the set the periodic sweep iterates, calling the
    /// dispatcher once per row.
    pub async fn list_deliverable(pool: &PgPool) -> Result<Vec<PendingCommand>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pending_commands
             WHERE published = false
               AND (expires_at IS NULL OR expires_at > NOW())
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, PendingCommand>(&query)
            .fetch_all(pool)
            .await
    }

    /// Deliverable records for a single account. Used when the account
    /// comes online to flush its backlog immediately.
    pub async fn list_deliverable_for_account(
        pool: &PgPool,
        target_account_id: DbId,
    ) -> Result<Vec<PendingCommand>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pending_commands
             WHERE target_account_id = $1
               AND published = false
               AND (expires_at IS NULL OR expires_at > NOW())
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, PendingCommand>(&query)
            .bind(target_account_id)
            .fetch_all(pool)
            .await
    }
}
