//! Per-task sharing grants.
//!
//! A [`Grant`] is a (task, user) pair mapped to a [`Permission`] level.
//! At most one grant exists per pair; re-sharing overwrites the level
//! in place. A grant confers content access only -- never deletion,
//! re-sharing, or ownership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskId;
use crate::user::UserId;

/// Access level conferred by a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    /// Read-only access to the task.
    Read,
    /// Read and content-edit access. Implies [`Permission::Read`].
    ReadWrite,
}

impl Permission {
    /// Returns `true` if this level allows editing task content.
    #[must_use]
    pub fn allows_edit(self) -> bool {
        self == Self::ReadWrite
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::ReadWrite => write!(f, "read_write"),
        }
    }
}

/// A sharing record: one user's permission level on one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// The shared task.
    pub task_id: TaskId,
    /// The user the task is shared with.
    pub user_id: UserId,
    /// The granted access level.
    pub permission: Permission,
    /// When the task was first shared with this user. Preserved when
    /// the permission level is overwritten.
    pub shared_at: DateTime<Utc>,
}

impl Grant {
    /// Creates a new grant stamped with the current time.
    #[must_use]
    pub fn new(task_id: TaskId, user_id: UserId, permission: Permission) -> Self {
        Self {
            task_id,
            user_id,
            permission,
            shared_at: Utc::now(),
        }
    }
}
