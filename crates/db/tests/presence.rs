//! Presence repository tests: state transitions and history segment
//! bookkeeping.

use sqlx::PgPool;
use vigil_core::presence::PresenceStatus;
use vigil_core::roles::Role;
use vigil_db::models::account::UpsertAccount;
use vigil_db::repositories::{AccountRepo, PresenceRepo};

async fn seed_employee(pool: &PgPool, tag: &str) -> i64 {
    AccountRepo::upsert(
        pool,
        &UpsertAccount {
            external_id: format!("ext-{tag}"),
            email: format!("{tag}@test.com"),
            display_name: tag.to_string(),
            role: Role::Employee,
            supervisor_id: None,
        },
    )
    .await
    .expect("seed account")
    .id
}

/// An account that never reported status is offline by default.
#[sqlx::test(migrations = "./migrations")]
async fn status_defaults_to_offline(pool: PgPool) {
    let id = seed_employee(&pool, "fresh").await;

    let status = PresenceRepo::get_status(&pool, id).await.unwrap();
    assert_eq!(status, PresenceStatus::Offline);
    assert!(PresenceRepo::get_state(&pool, id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn online_then_offline_closes_exactly_one_segment(pool: PgPool) {
    let id = seed_employee(&pool, "cycle").await;

    PresenceRepo::set_online(&pool, id).await.unwrap();
    assert_eq!(
        PresenceRepo::get_status(&pool, id).await.unwrap(),
        PresenceStatus::Online
    );

    PresenceRepo::set_offline(&pool, id).await.unwrap();
    assert_eq!(
        PresenceRepo::get_status(&pool, id).await.unwrap(),
        PresenceStatus::Offline
    );

    let history = PresenceRepo::history(&pool, id).await.unwrap();
    assert_eq!(history.len(), 1);
    let closed: Vec<_> = history
        .iter()
        .filter(|s| s.disconnected_at.is_some())
        .collect();
    assert_eq!(closed.len(), 1, "exactly one closed segment");

    let state = PresenceRepo::get_state(&pool, id).await.unwrap().unwrap();
    assert_eq!(
        closed[0].disconnected_at.unwrap(),
        state.last_seen_at,
        "segment closes with the offline call's timestamp"
    );
}

/// Duplicate online reports (reconnects) must not accumulate open
/// segments: the previous open segment is closed before a new one opens.
#[sqlx::test(migrations = "./migrations")]
async fn double_online_keeps_single_open_segment(pool: PgPool) {
    let id = seed_employee(&pool, "reconnect").await;

    PresenceRepo::set_online(&pool, id).await.unwrap();
    PresenceRepo::set_online(&pool, id).await.unwrap();

    let open = PresenceRepo::open_segments(&pool, id).await.unwrap();
    assert_eq!(open.len(), 1, "at most one open segment per account");

    let history = PresenceRepo::history(&pool, id).await.unwrap();
    assert_eq!(history.len(), 2, "both reports leave a segment");
    assert!(history[0].disconnected_at.is_some(), "first was closed");
}

/// Offline with no open segment touches state but not history.
#[sqlx::test(migrations = "./migrations")]
async fn offline_without_open_segment_is_history_noop(pool: PgPool) {
    let id = seed_employee(&pool, "coldoff").await;

    PresenceRepo::set_offline(&pool, id).await.unwrap();

    assert_eq!(
        PresenceRepo::get_status(&pool, id).await.unwrap(),
        PresenceStatus::Offline
    );
    assert!(PresenceRepo::history(&pool, id).await.unwrap().is_empty());

    // A second offline call is equally harmless.
    PresenceRepo::set_offline(&pool, id).await.unwrap();
    assert!(PresenceRepo::history(&pool, id).await.unwrap().is_empty());
}

/// A status change for a nonexistent account fails the FK check and, being
/// transactional, leaves both presence tables untouched.
#[sqlx::test(migrations = "./migrations")]
async fn failed_call_leaves_no_partial_state(pool: PgPool) {
    let missing_id = 999_999;

    let result = PresenceRepo::set_online(&pool, missing_id).await;
    assert!(result.is_err());

    assert!(PresenceRepo::get_state(&pool, missing_id).await.unwrap().is_none());
    assert!(PresenceRepo::history(&pool, missing_id).await.unwrap().is_empty());
}
