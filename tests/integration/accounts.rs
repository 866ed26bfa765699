//! Integration tests for user accounts and the HTTP Basic handshake.
//!
//! Covers registration, credential verification, the admin gate on
//! account management, and the protected-relationship rule that an
//! account owning tasks cannot be deleted.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use taskhub_core::error::OpsError;
use taskhub_core::task::TaskFields;
use taskhub_core::user::{Principal, Role};
use taskhub_server::accounts::Accounts;
use taskhub_server::auth::{hash_password, parse_basic, verify_password};
use taskhub_server::ops::TaskOps;
use taskhub_server::store::{GrantStore, TaskStore, UserStore};

struct World {
    ops: TaskOps,
    accounts: Accounts,
}

fn make_world() -> World {
    let tasks = Arc::new(TaskStore::new());
    let grants = Arc::new(GrantStore::new());
    let users = Arc::new(UserStore::new());
    World {
        ops: TaskOps::new(Arc::clone(&tasks), Arc::clone(&grants), Arc::clone(&users)),
        accounts: Accounts::new(users, tasks, grants),
    }
}

#[tokio::test]
async fn register_and_login_round_trip() {
    let world = make_world();
    world.accounts.register("alice", "s3cret").await.unwrap();

    let user = world
        .accounts
        .verify_credentials("alice", "s3cret")
        .await
        .unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.role, Role::User);

    assert!(
        world
            .accounts
            .verify_credentials("alice", "wrong")
            .await
            .is_none()
    );
}

#[tokio::test]
async fn stored_credentials_are_hashed() {
    let world = make_world();
    world.accounts.register("alice", "s3cret").await.unwrap();

    let user = world
        .accounts
        .verify_credentials("alice", "s3cret")
        .await
        .unwrap();
    assert_ne!(user.password_hash, "s3cret");
    assert!(verify_password("s3cret", &user.password_hash));
}

#[tokio::test]
async fn duplicate_username_is_conflict() {
    let world = make_world();
    world.accounts.register("alice", "pw").await.unwrap();

    let result = world.accounts.register("alice", "pw2").await;
    assert!(matches!(result, Err(OpsError::Conflict(_))));
}

#[tokio::test]
async fn user_with_owned_tasks_cannot_be_deleted() {
    let world = make_world();
    let admin_profile = world.accounts.seed_admin("root", "pw").await.unwrap();
    let admin = Principal::new(admin_profile.id, Role::Admin);

    let alice_profile = world.accounts.register("alice", "pw").await.unwrap();
    let alice = Principal::new(alice_profile.id, Role::User);

    let task = world
        .ops
        .create_task(
            &alice,
            TaskFields {
                title: "Owned".to_string(),
                ..TaskFields::default()
            },
        )
        .await
        .unwrap();

    // Ownership is protected: deletion refused while tasks remain.
    let result = world.accounts.delete_user(&admin, alice.user_id).await;
    assert!(matches!(result, Err(OpsError::Conflict(_))));

    // Once the task is gone, deletion proceeds.
    world.ops.delete_task(&alice, task.id).await.unwrap();
    world
        .accounts
        .delete_user(&admin, alice.user_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn deleting_grant_holder_cleans_their_grants() {
    let world = make_world();
    let admin_profile = world.accounts.seed_admin("root", "pw").await.unwrap();
    let admin = Principal::new(admin_profile.id, Role::Admin);

    let owner_profile = world.accounts.register("owner", "pw").await.unwrap();
    let owner = Principal::new(owner_profile.id, Role::User);
    let reader_profile = world.accounts.register("reader", "pw").await.unwrap();

    let task = world
        .ops
        .create_task(
            &owner,
            TaskFields {
                title: "Shared".to_string(),
                ..TaskFields::default()
            },
        )
        .await
        .unwrap();
    world
        .ops
        .share_task(
            &owner,
            task.id,
            taskhub_server::ops::ShareTarget {
                user_id: reader_profile.id,
                permission: taskhub_core::grant::Permission::Read,
            },
        )
        .await
        .unwrap();

    world
        .accounts
        .delete_user(&admin, reader_profile.id)
        .await
        .unwrap();

    let detail = world.ops.get_task(&owner, task.id).await.unwrap();
    assert!(detail.grants.is_empty());
}

#[tokio::test]
async fn non_admin_cannot_manage_accounts() {
    let world = make_world();
    let alice_profile = world.accounts.register("alice", "pw").await.unwrap();
    let bob_profile = world.accounts.register("bob", "pw").await.unwrap();
    let alice = Principal::new(alice_profile.id, Role::User);

    assert!(matches!(
        world.accounts.list_users(&alice).await,
        Err(OpsError::Forbidden(_))
    ));
    assert!(matches!(
        world.accounts.delete_user(&alice, bob_profile.id).await,
        Err(OpsError::Forbidden(_))
    ));
}

#[test]
fn basic_header_round_trip() {
    use base64::Engine as _;
    let token = base64::engine::general_purpose::STANDARD.encode("alice:s3cret");
    let parsed = parse_basic(&format!("Basic {token}")).unwrap();
    assert_eq!(parsed, ("alice".to_string(), "s3cret".to_string()));

    let stored = hash_password("s3cret");
    assert!(verify_password(&parsed.1, &stored));
}
