//! Repository for `presence_state` and `presence_history`.
//!
//! Each status change does two writes (state upsert + history mutation)
//! inside one transaction, so a storage failure mid-call leaves both
//! tables at their pre-call values.
//!
//! Concurrent status calls for the same account are not serialized here;
//! two racing calls can interleave between transactions. Per-call
//! atomicity is the only guarantee this layer makes.

use sqlx::PgPool;
use vigil_core::presence::PresenceStatus;
use vigil_core::types::DbId;

use crate::models::presence::{PresenceSegment, PresenceState};

const STATE_COLUMNS: &str = "id, account_id, status, last_seen_at";
const SEGMENT_COLUMNS: &str = "id, account_id, connected_at, disconnected_at";

/// Tracks current online/offline state plus the append-only connection
/// history log.
pub struct PresenceRepo;

impl PresenceRepo {
    /// Mark an account online and open a fresh history segment.
    ///
    /// Any segment still open for the account is closed first (with the
    /// same timestamp), so duplicate online reports -- e.g. a client
    /// reconnecting without ever reporting offline -- cannot accumulate
    /// concurrently open segments.
    pub async fn set_online(pool: &PgPool, account_id: DbId) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO presence_state (account_id, status, last_seen_at)
             VALUES ($1, 'online', NOW())
             ON CONFLICT (account_id) DO UPDATE SET
                status = 'online',
                last_seen_at = NOW()",
        )
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

        let closed = sqlx::query(
            "UPDATE presence_history SET disconnected_at = NOW()
             WHERE account_id = $1 AND disconnected_at IS NULL",
        )
        .bind(account_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if closed > 0 {
            tracing::debug!(account_id, closed, "Closed stale open segments on online report");
        }

        sqlx::query(
            "INSERT INTO presence_history (account_id, connected_at)
             VALUES ($1, NOW())",
        )
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    /// Mark an account offline and close its open history segment.
    ///
    /// If several segments are somehow open, only the most recently opened
    /// one is closed. No open segment is a history no-op, not an error.
    pub async fn set_offline(pool: &PgPool, account_id: DbId) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO presence_state (account_id, status, last_seen_at)
             VALUES ($1, 'offline', NOW())
             ON CONFLICT (account_id) DO UPDATE SET
                status = 'offline',
                last_seen_at = NOW()",
        )
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE presence_history SET disconnected_at = NOW()
             WHERE id = (
                SELECT id FROM presence_history
                WHERE account_id = $1 AND disconnected_at IS NULL
                ORDER BY connected_at DESC, id DESC
                LIMIT 1
             )",
        )
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    /// Current status for an account; offline when no state row exists.
    pub async fn get_status(
        pool: &PgPool,
        account_id: DbId,
    ) -> Result<PresenceStatus, sqlx::Error> {
        let state = Self::get_state(pool, account_id).await?;
        Ok(match state {
            Some(s) if s.status == "online" => PresenceStatus::Online,
            _ => PresenceStatus::Offline,
        })
    }

    /// The live state row, if one has been created yet.
    pub async fn get_state(
        pool: &PgPool,
        account_id: DbId,
    ) -> Result<Option<PresenceState>, sqlx::Error> {
        let query = format!("SELECT {STATE_COLUMNS} FROM presence_state WHERE account_id = $1");
        sqlx::query_as::<_, PresenceState>(&query)
            .bind(account_id)
            .fetch_optional(pool)
            .await
    }

    /// Full connection history for an account, oldest first.
    pub async fn history(
        pool: &PgPool,
        account_id: DbId,
    ) -> Result<Vec<PresenceSegment>, sqlx::Error> {
        let query = format!(
            "SELECT {SEGMENT_COLUMNS} FROM presence_history
             WHERE account_id = $1
             ORDER BY connected_at ASC, id ASC"
        );
        sqlx::query_as::<_, PresenceSegment>(&query)
            .bind(account_id)
            .fetch_all(pool)
            .await
    }

    /// Segments still open for an account. More than one element here means
    /// the single-open-segment invariant has been violated.
    pub async fn open_segments(
        pool: &PgPool,
        account_id: DbId,
    ) -> Result<Vec<PresenceSegment>, sqlx::Error> {
        let query = format!(
            "SELECT {SEGMENT_COLUMNS} FROM presence_history
             WHERE account_id = $1 AND disconnected_at IS NULL
             ORDER BY connected_at ASC, id ASC"
        );
        sqlx::query_as::<_, PresenceSegment>(&query)
            .bind(account_id)
            .fetch_all(pool)
            .await
    }
}
