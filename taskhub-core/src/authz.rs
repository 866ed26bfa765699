//! Authorization engine: who may do what to a task.
//!
//! Three authority sources combine into one decision: the global role,
//! task ownership, and per-task grants. The rules are evaluated
//! short-circuit, first match wins:
//!
//! 1. Admin role: allow, for every action.
//! 2. Owner (reporter): allow, for every action.
//! 3. `View`: allow if the caller holds any grant on the task.
//! 4. `Edit`: allow if the caller holds a `ReadWrite` grant.
//! 5. `Delete` and `Share`: deny.
//!
//! The asymmetry in rule 5 is the load-bearing invariant: grants
//! authorize content access only and never structural rights, so a
//! grant recipient cannot destroy or redistribute a task they do not
//! own. [`decide`] is a pure function -- safe for unlimited parallel
//! invocation, and it must be the only place this three-way check
//! lives. Call sites compose it; they never re-derive it.

use crate::grant::{Grant, Permission};
use crate::task::{Task, TaskId};
use crate::user::{Principal, UserId};

/// An action a principal can attempt on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read the task and its grant list.
    View,
    /// Change the task's content fields.
    Edit,
    /// Delete the task (cascades its grants).
    Delete,
    /// Create or overwrite grants on the task.
    Share,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::View => write!(f, "view"),
            Self::Edit => write!(f, "edit"),
            Self::Delete => write!(f, "delete"),
            Self::Share => write!(f, "share"),
        }
    }
}

/// The outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The principal may perform the action.
    Allow,
    /// The principal may not perform the action.
    Deny,
}

impl Decision {
    /// Returns `true` for [`Decision::Allow`].
    #[must_use]
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }
}

/// Decides whether `principal` may perform `action` on `task`.
///
/// `grants` is the task's eagerly-loaded grant list; entries whose
/// `task_id` does not match the task are ignored.
#[must_use]
pub fn decide(principal: &Principal, task: &Task, grants: &[Grant], action: Action) -> Decision {
    if principal.is_admin() {
        return Decision::Allow;
    }
    if principal.user_id == task.reporter_id {
        return Decision::Allow;
    }

    let own_grant = grants
        .iter()
        .find(|g| g.task_id == task.id && g.user_id == principal.user_id);

    match action {
        Action::View => {
            // Any grant level confers visibility.
            if own_grant.is_some() {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }
        Action::Edit => {
            if own_grant.is_some_and(|g| g.permission.allows_edit()) {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }
        // Structural actions stay owner/admin-exclusive no matter the
        // grant level.
        Action::Delete | Action::Share => Decision::Deny,
    }
}

/// Returns `true` if `user_id` holds a `ReadWrite` grant on `task_id`.
///
/// The raw grant check, independent of ownership and role, for callers
/// that need to compose edit permission at the call site. Like
/// [`decide`], grants on other tasks are ignored, so the slice need
/// not be pre-filtered.
#[must_use]
pub fn has_edit_grant(grants: &[Grant], task_id: TaskId, user_id: UserId) -> bool {
    grants.iter().any(|g| {
        g.task_id == task_id && g.user_id == user_id && g.permission == Permission::ReadWrite
    })
}
