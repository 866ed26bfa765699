//! Property-based tests for the authorization decision table.
//!
//! Uses proptest to verify, over arbitrary role/ownership/grant
//! combinations:
//! 1. Admins are allowed every action on every task.
//! 2. Owners are allowed every action on their tasks.
//! 3. No grant configuration ever allows `Delete` or `Share` to a
//!    non-owner, non-admin caller.
//! 4. `Edit` allowed implies `View` allowed (write implies read).
//! 5. Without role, ownership, or a grant, everything is denied.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use taskhub_core::authz::{Action, Decision, decide, has_edit_grant};
use taskhub_core::grant::{Grant, Permission};
use taskhub_core::task::{Task, TaskFields, TaskId};
use taskhub_core::user::{Principal, Role, UserId};
use uuid::Uuid;

// --- Strategies ---

/// Strategy for generating arbitrary `UserId` values.
fn arb_user_id() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

/// Strategy for generating arbitrary `TaskId` values.
fn arb_task_id() -> impl Strategy<Value = TaskId> {
    any::<u128>().prop_map(|n| TaskId::from_uuid(Uuid::from_u128(n)))
}

/// Strategy for generating arbitrary roles.
fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Admin)]
}

/// Strategy for generating arbitrary permission levels.
fn arb_permission() -> impl Strategy<Value = Permission> {
    prop_oneof![Just(Permission::Read), Just(Permission::ReadWrite)]
}

/// Strategy for generating arbitrary actions.
fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::View),
        Just(Action::Edit),
        Just(Action::Delete),
        Just(Action::Share),
    ]
}

/// Builds a task owned by `reporter` with a fixed id.
fn make_task(id: TaskId, reporter: UserId) -> Task {
    let mut task = Task::create(
        reporter,
        TaskFields {
            title: "property task".to_string(),
            ..TaskFields::default()
        },
    );
    task.id = id;
    task
}

/// Strategy for a grant list on `task_id`, with up to four holders.
fn arb_grants(task_id: TaskId) -> impl Strategy<Value = Vec<Grant>> {
    prop::collection::vec((arb_user_id(), arb_permission()), 0..4).prop_map(move |pairs| {
        pairs
            .into_iter()
            .map(|(user_id, permission)| Grant::new(task_id, user_id, permission))
            .collect()
    })
}

proptest! {
    #[test]
    fn admin_always_allowed(
        (task_id, grants) in arb_task_id().prop_flat_map(|tid| (Just(tid), arb_grants(tid))),
        reporter in arb_user_id(),
        admin_id in arb_user_id(),
        action in arb_action(),
    ) {
        let task = make_task(task_id, reporter);
        let admin = Principal::new(admin_id, Role::Admin);
        prop_assert_eq!(decide(&admin, &task, &grants, action), Decision::Allow);
    }

    #[test]
    fn owner_always_allowed(
        task_id in arb_task_id(),
        reporter in arb_user_id(),
        role in arb_role(),
        action in arb_action(),
    ) {
        let task = make_task(task_id, reporter);
        let owner = Principal::new(reporter, role);
        prop_assert_eq!(decide(&owner, &task, &[], action), Decision::Allow);
    }

    #[test]
    fn grants_never_confer_structural_rights(
        task_id in arb_task_id(),
        reporter in arb_user_id(),
        caller in arb_user_id(),
        permission in arb_permission(),
    ) {
        prop_assume!(caller != reporter);
        let task = make_task(task_id, reporter);
        let grants = vec![Grant::new(task_id, caller, permission)];
        let principal = Principal::new(caller, Role::User);

        prop_assert_eq!(decide(&principal, &task, &grants, Action::Delete), Decision::Deny);
        prop_assert_eq!(decide(&principal, &task, &grants, Action::Share), Decision::Deny);
    }

    #[test]
    fn edit_allowed_implies_view_allowed(
        (task_id, grants) in arb_task_id().prop_flat_map(|tid| (Just(tid), arb_grants(tid))),
        reporter in arb_user_id(),
        caller_id in arb_user_id(),
        role in arb_role(),
    ) {
        let task = make_task(task_id, reporter);
        let principal = Principal::new(caller_id, role);

        if decide(&principal, &task, &grants, Action::Edit) == Decision::Allow {
            prop_assert_eq!(decide(&principal, &task, &grants, Action::View), Decision::Allow);
        }
    }

    #[test]
    fn unrelated_caller_always_denied(
        task_id in arb_task_id(),
        reporter in arb_user_id(),
        caller in arb_user_id(),
        action in arb_action(),
        other_holders in prop::collection::vec((arb_user_id(), arb_permission()), 0..4),
    ) {
        prop_assume!(caller != reporter);
        prop_assume!(other_holders.iter().all(|(id, _)| *id != caller));

        let task = make_task(task_id, reporter);
        let grants: Vec<Grant> = other_holders
            .into_iter()
            .map(|(user_id, permission)| Grant::new(task_id, user_id, permission))
            .collect();
        let principal = Principal::new(caller, Role::User);

        prop_assert_eq!(decide(&principal, &task, &grants, action), Decision::Deny);
    }

    #[test]
    fn edit_grant_check_matches_decision(
        task_id in arb_task_id(),
        other_task_id in arb_task_id(),
        reporter in arb_user_id(),
        caller in arb_user_id(),
        permission in arb_permission(),
        other_permission in arb_permission(),
    ) {
        prop_assume!(caller != reporter);
        prop_assume!(task_id != other_task_id);
        let task = make_task(task_id, reporter);
        // A second grant on an unrelated task must not change either answer.
        let grants = vec![
            Grant::new(task_id, caller, permission),
            Grant::new(other_task_id, caller, other_permission),
        ];
        let principal = Principal::new(caller, Role::User);

        let decision = decide(&principal, &task, &grants, Action::Edit);
        prop_assert_eq!(
            decision == Decision::Allow,
            has_edit_grant(&grants, task_id, caller)
        );
    }
}
