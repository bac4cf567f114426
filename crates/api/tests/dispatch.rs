//! Integration tests for the dispatcher's failure handling, using a
//! broadcaster mock that refuses every send.

mod common;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use vigil_api::broadcast::{BroadcastError, Broadcaster};
use vigil_api::dispatch;
use vigil_core::command::CommandKind;
use vigil_core::roles::Role;
use vigil_db::repositories::command_repo::CommandRepo;
use vigil_db::repositories::presence_repo::PresenceRepo;

/// A broadcast channel that is always down.
struct FailingBroadcaster;

#[async_trait]
impl Broadcaster for FailingBroadcaster {
    async fn send(&self, group: &str, _payload: serde_json::Value) -> Result<(), BroadcastError> {
        Err(BroadcastError {
            group: group.to_string(),
            message: "channel down".to_string(),
        })
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn broadcast_failure_is_absorbed_and_row_untouched(pool: PgPool) {
    let account = common::seed_account(&pool, "emp-1", "emp1@example.com", Role::Employee, None)
        .await;
    PresenceRepo::set_online(&pool, account.id).await.unwrap();

    let command = CommandRepo::create(&pool, account.id, CommandKind::Start, Utc::now(), None)
        .await
        .unwrap();

    let delivered = dispatch::try_deliver(&pool, &FailingBroadcaster, &account, &command)
        .await
        .expect("a failed broadcast is not an error");
    assert!(!delivered);

    let row = CommandRepo::find_by_id(&pool, command.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!row.published);
    assert!(row.published_at.is_none());
    assert_eq!(row.attempt_count, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn retry_after_recovery_publishes(pool: PgPool) {
    let account = common::seed_account(&pool, "emp-1", "emp1@example.com", Role::Employee, None)
        .await;
    PresenceRepo::set_online(&pool, account.id).await.unwrap();

    let command = CommandRepo::create(&pool, account.id, CommandKind::Stop, Utc::now(), None)
        .await
        .unwrap();

    // First attempt fails and leaves the row deliverable.
    dispatch::try_deliver(&pool, &FailingBroadcaster, &account, &command)
        .await
        .unwrap();
    let deliverable = CommandRepo::list_deliverable(&pool).await.unwrap();
    assert_eq!(deliverable.len(), 1);

    // The channel recovers; a sweep pass delivers it.
    let (_, broadcaster) = common::build_test_app(pool.clone());
    let mut rx = broadcaster.add("conn-1".into(), "emp-1".into()).await;
    let delivered = dispatch::sweep_deliverable(&pool, broadcaster.as_ref())
        .await
        .unwrap();
    assert_eq!(delivered, 1);
    assert!(rx.try_recv().is_ok());

    let row = CommandRepo::find_by_id(&pool, command.id)
        .await
        .unwrap()
        .unwrap();
    assert!(row.published);
    assert_eq!(row.attempt_count, 1);
}
