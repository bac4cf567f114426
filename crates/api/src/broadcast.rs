//! The broadcast-channel seam.
//!
//! Delivery pushes command payloads to a named group; whichever sessions
//! currently hold that group membership receive the message, best-effort
//! at-least-once, no ordering guarantee. The production implementation is
//! [`crate::ws::GroupBroadcaster`]; tests substitute a recording mock.

use async_trait::async_trait;

/// A failed broadcast attempt.
///
/// Always transient from the queue's point of view: the command stays
/// pending and is eligible for a later delivery attempt.
#[derive(Debug, thiserror::Error)]
#[error("Broadcast to group '{group}' failed: {message}")]
pub struct BroadcastError {
    pub group: String,
    pub message: String,
}

/// Point-to-multipoint fan-out keyed by group identity.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Push a JSON payload to every session in `group`.
    async fn send(&self, group: &str, payload: serde_json::Value) -> Result<(), BroadcastError>;
}
