//! Presence state and history row models.

use serde::Serialize;
use sqlx::FromRow;
use vigil_core::types::{DbId, Timestamp};

/// The single live presence row for an account (`presence_state` table).
///
/// Created lazily on the first status report; an account with no row is
/// offline by definition.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PresenceState {
    pub id: DbId,
    pub account_id: DbId,
    /// `online` or `offline`.
    pub status: String,
    pub last_seen_at: Timestamp,
}

/// One contiguous connected interval (`presence_history` table).
///
/// Append-only: rows are only ever mutated once, to set `disconnected_at`.
/// Invariant: at most one open segment (`disconnected_at IS NULL`) per
/// account.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PresenceSegment {
    pub id: DbId,
    pub account_id: DbId,
    pub connected_at: Timestamp,
    pub disconnected_at: Option<Timestamp>,
}
