//! Tests for the SQLite stores.

use hy2_core::{keys, AccountStore, Role, SettingsStore};

use crate::{Db, SqlAccountStore, SqlSettingsStore};

async fn setup() -> (Db, SqlAccountStore, SqlSettingsStore) {
    let db = Db::connect_in_memory().await.expect("connect");
    db.init_schema().await.expect("init schema");
    let accounts = SqlAccountStore::new(&db);
    let settings = SqlSettingsStore::new(&db);
    (db, accounts, settings)
}

#[allow(clippy::too_many_arguments)]
async fn insert_account(
    db: &Db,
    id: i64,
    username: &str,
    con_pass: &str,
    quota: i64,
    download: i64,
    upload: i64,
    expire_time: i64,
    kick_until_time: i64,
    deleted: bool,
) {
    sqlx::query(
        "INSERT INTO account (id, username, pass, con_pass, quota, download, upload, \
         expire_time, kick_until_time, device_no, role, deleted) \
         VALUES (?, ?, '', ?, ?, ?, ?, ?, ?, 3, 'user', ?)",
    )
    .bind(id)
    .bind(username)
    .bind(con_pass)
    .bind(quota)
    .bind(download)
    .bind(upload)
    .bind(expire_time)
    .bind(kick_until_time)
    .bind(deleted)
    .execute(db.pool())
    .await
    .expect("insert account");
}

const NOW: i64 = 1_700_000_000_000;
const FUTURE: i64 = NOW + 86_400_000;

#[tokio::test]
async fn schema_bootstrap_is_idempotent() {
    let (db, _, _) = setup().await;
    db.init_schema().await.expect("second run");
}

#[tokio::test]
async fn seeds_bootstrap_admin() {
    let (_, accounts, _) = setup().await;
    let admin = accounts.find_by_id(1).await.unwrap().expect("seed row");
    assert_eq!(admin.username, "sysadmin");
    assert_eq!(admin.role, Role::Admin);
    assert!(admin.quota < 0);
}

#[tokio::test]
async fn find_eligible_matches_a_good_account() {
    let (db, accounts, _) = setup().await;
    insert_account(&db, 10, "alice", "abc", -1, 0, 0, FUTURE, 0, false).await;

    let account = accounts.find_eligible("abc", NOW).await.unwrap().unwrap();
    assert_eq!(account.id, 10);
    assert_eq!(account.username, "alice");
}

#[tokio::test]
async fn find_eligible_excludes_each_failing_condition() {
    let (db, accounts, _) = setup().await;
    insert_account(&db, 10, "deleted", "a", -1, 0, 0, FUTURE, 0, true).await;
    insert_account(&db, 11, "expired", "b", -1, 0, 0, NOW - 1, 0, false).await;
    insert_account(&db, 12, "kicked", "c", -1, 0, 0, FUTURE, NOW + 60_000, false).await;
    insert_account(&db, 13, "broke", "d", 100, 60, 41, FUTURE, 0, false).await;

    for secret in ["a", "b", "c", "d"] {
        assert!(
            accounts.find_eligible(secret, NOW).await.unwrap().is_none(),
            "secret {secret} should be ineligible"
        );
    }
}

#[tokio::test]
async fn find_eligible_quota_boundary_is_strict() {
    let (db, accounts, _) = setup().await;
    // 60 + 40 = 100 is not strictly over quota.
    insert_account(&db, 10, "edge", "edge", 100, 60, 40, FUTURE, 0, false).await;
    assert!(accounts.find_eligible("edge", NOW).await.unwrap().is_some());
}

#[tokio::test]
async fn find_eligible_time_boundaries_are_exclusive() {
    let (db, accounts, _) = setup().await;
    insert_account(&db, 10, "at-expiry", "x", -1, 0, 0, NOW, 0, false).await;
    insert_account(&db, 11, "at-kick-end", "y", -1, 0, 0, FUTURE, NOW, false).await;

    // now == expire_time is expired; now == kick_until_time is still kicked.
    assert!(accounts.find_eligible("x", NOW).await.unwrap().is_none());
    assert!(accounts.find_eligible("y", NOW).await.unwrap().is_none());
    assert!(accounts.find_eligible("y", NOW + 1).await.unwrap().is_some());
}

#[tokio::test]
async fn find_by_con_pass_excludes_deleted_rows() {
    let (db, accounts, _) = setup().await;
    insert_account(&db, 10, "gone", "abc", -1, 0, 0, FUTURE, 0, true).await;
    assert!(accounts.find_by_con_pass("abc").await.unwrap().is_none());

    // Even an expired or kicked account is still visible to plain lookups.
    insert_account(&db, 11, "stale", "def", -1, 0, 0, NOW - 1, 0, false).await;
    assert!(accounts.find_by_con_pass("def").await.unwrap().is_some());
}

#[tokio::test]
async fn list_by_ids_returns_only_requested_rows() {
    let (db, accounts, _) = setup().await;
    insert_account(&db, 10, "alice", "a", -1, 0, 0, FUTURE, 0, false).await;
    insert_account(&db, 11, "bob", "b", -1, 0, 0, FUTURE, 0, false).await;
    insert_account(&db, 12, "carol", "c", -1, 0, 0, FUTURE, 0, true).await;

    let mut names: Vec<String> = accounts
        .list_by_ids(&[10, 11, 12])
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.username)
        .collect();
    names.sort();
    // Deleted carol is excluded.
    assert_eq!(names, ["alice", "bob"]);

    assert!(accounts.list_by_ids(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn set_kick_until_updates_listed_accounts_only() {
    let (db, accounts, _) = setup().await;
    insert_account(&db, 10, "alice", "a", -1, 0, 0, FUTURE, 0, false).await;
    insert_account(&db, 11, "bob", "b", -1, 0, 0, FUTURE, 0, false).await;
    insert_account(&db, 12, "carol", "c", -1, 0, 0, FUTURE, 0, false).await;

    let until = NOW + 3_600_000;
    accounts.set_kick_until(&[10, 11], until).await.unwrap();

    let alice = accounts.find_by_id(10).await.unwrap().unwrap();
    let bob = accounts.find_by_id(11).await.unwrap().unwrap();
    let carol = accounts.find_by_id(12).await.unwrap().unwrap();
    assert_eq!(alice.kick_until_time, until);
    assert_eq!(bob.kick_until_time, until);
    assert_eq!(carol.kick_until_time, 0);

    // Kicked accounts fail the eligibility read until the deadline elapses.
    assert!(accounts.find_eligible("a", NOW).await.unwrap().is_none());
    assert!(accounts
        .find_eligible("a", until + 1)
        .await
        .unwrap()
        .is_some());

    // Repeating with the same deadline leaves the same state.
    accounts.set_kick_until(&[10, 11], until).await.unwrap();
    let alice = accounts.find_by_id(10).await.unwrap().unwrap();
    assert_eq!(alice.kick_until_time, until);
}

#[tokio::test]
async fn set_kick_until_with_no_ids_is_a_no_op() {
    let (_, accounts, _) = setup().await;
    accounts.set_kick_until(&[], 123).await.unwrap();
}

#[tokio::test]
async fn settings_distinguish_absent_from_empty() {
    let (_, _, settings) = setup().await;

    // Seeded with an empty value.
    let engine_config = settings.get(keys::ENGINE_CONFIG).await.unwrap().unwrap();
    assert!(engine_config.value.is_empty());

    // Seeded with a generated secret.
    let secret = settings.get(keys::JWT_SECRET).await.unwrap().unwrap();
    assert!(!secret.value.is_empty());

    // Never seeded at all.
    assert!(settings.get("NO_SUCH_KEY").await.unwrap().is_none());
}

#[tokio::test]
async fn settings_value_roundtrip() {
    let (db, _, settings) = setup().await;
    sqlx::query("UPDATE config SET value = ? WHERE key = ?")
        .bind("listen: :443")
        .bind(keys::ENGINE_CONFIG)
        .execute(db.pool())
        .await
        .unwrap();

    let setting = settings.get(keys::ENGINE_CONFIG).await.unwrap().unwrap();
    assert_eq!(setting.value, "listen: :443");
}
