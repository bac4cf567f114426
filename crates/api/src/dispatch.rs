//! Command delivery: the bridge between the stored queue and the broadcast
//! channel.
//!
//! Delivery is at-least-once. A command is only marked published after the
//! broadcast send returns success; a failed or skipped send leaves the row
//! untouched so the periodic sweep (or the account's next reconnect) retries
//! it.

use serde_json::json;
use vigil_core::command::{group_id, CommandPayload};
use vigil_core::presence::PresenceStatus;
use vigil_db::models::account::Account;
use vigil_db::models::command::PendingCommand;
use vigil_db::repositories::account_repo::AccountRepo;
use vigil_db::repositories::command_repo::CommandRepo;
use vigil_db::repositories::presence_repo::PresenceRepo;
use vigil_db::DbPool;

use crate::broadcast::Broadcaster;
use crate::error::AppResult;

/// Attempt to deliver one command to its target.
///
/// Checks current presence first: an offline target is a skip, not an
/// error. Broadcast failures are absorbed (logged at warn) because the
/// queue row is the source of truth and a later attempt will retry.
///
/// Returns `true` if the command was broadcast and marked published.
pub async fn try_deliver(
    pool: &DbPool,
    broadcaster: &dyn Broadcaster,
    account: &Account,
    command: &PendingCommand,
) -> AppResult<bool> {
    let status = PresenceRepo::get_status(pool, account.id).await?;
    if status != PresenceStatus::Online {
        tracing::debug!(
            command_id = command.id,
            account_id = account.id,
            "Delivery skipped, target offline"
        );
        return Ok(false);
    }

    let payload = CommandPayload {
        id: command.id,
        command: command.kind()?,
        timestamp: command.issued_at,
    };
    let group = group_id(&account.external_id);

    if let Err(e) = broadcaster.send(&group, json!(payload)).await {
        tracing::warn!(
            command_id = command.id,
            group = %group,
            error = %e,
            "Broadcast failed, command stays queued"
        );
        return Ok(false);
    }

    CommandRepo::mark_published(pool, command.id).await?;
    tracing::info!(command_id = command.id, group = %group, "Command delivered");
    Ok(true)
}

/// Flush the deliverable backlog for one account.
///
/// Called when the account reports online, so commands issued while it was
/// away reach it without waiting for the sweep. Returns how many were
/// published.
pub async fn deliver_pending(
    pool: &DbPool,
    broadcaster: &dyn Broadcaster,
    account: &Account,
) -> AppResult<usize> {
    let backlog = CommandRepo::list_deliverable_for_account(pool, account.id).await?;
    let mut delivered = 0;
    for command in &backlog {
        if try_deliver(pool, broadcaster, account, command).await? {
            delivered += 1;
        }
    }
    Ok(delivered)
}

/// One pass over every deliverable command in the queue.
///
/// Used by the background sweep. Rows whose target account has since been
/// soft-deleted are skipped.
pub async fn sweep_deliverable(pool: &DbPool, broadcaster: &dyn Broadcaster) -> AppResult<usize> {
    let deliverable = CommandRepo::list_deliverable(pool).await?;
    let mut delivered = 0;
    for command in &deliverable {
        let Some(account) = AccountRepo::find_by_id(pool, command.target_account_id).await? else {
            continue;
        };
        if try_deliver(pool, broadcaster, &account, command).await? {
            delivered += 1;
        }
    }
    Ok(delivered)
}
