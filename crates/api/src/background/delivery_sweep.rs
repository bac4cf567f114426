//! Periodic retry of undelivered commands.
//!
//! Spawns a background task that walks the deliverable backlog (unpublished,
//! unexpired) and re-attempts delivery for targets that are currently
//! online. Runs on a fixed interval using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use vigil_db::DbPool;

use crate::dispatch;
use crate::ws::GroupBroadcaster;

/// Run the delivery sweep loop.
///
/// Each tick attempts delivery for every queued command whose target is
/// online. Runs until `cancel` is triggered. Errors are logged and the
/// loop keeps going; a bad tick must not kill retries forever.
pub async fn run(
    pool: DbPool,
    broadcaster: Arc<GroupBroadcaster>,
    interval_secs: u64,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs, "Delivery sweep job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Delivery sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                match dispatch::sweep_deliverable(&pool, broadcaster.as_ref()).await {
                    Ok(delivered) => {
                        if delivered > 0 {
                            tracing::info!(delivered, "Delivery sweep: published queued commands");
                        } else {
                            tracing::debug!("Delivery sweep: nothing deliverable");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Delivery sweep: pass failed");
                    }
                }
            }
        }
    }
}
