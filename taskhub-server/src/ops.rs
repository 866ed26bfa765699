//! Task operations service: CRUD and sharing, authorization-gated.
//!
//! Every mutating or sensitive read operation loads the target task and
//! its grants, asks [`taskhub_core::authz::decide`] for a decision, and
//! fails closed on denial. "Not found" and "not authorized" are
//! distinct outcomes: a missing task is [`OpsError::NotFound`] before
//! any permission check, and a denial is always
//! [`OpsError::Forbidden`], never data omission.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use taskhub_core::authz::{self, Action};
use taskhub_core::error::OpsError;
use taskhub_core::grant::{Grant, Permission};
use taskhub_core::task::{Task, TaskFields, TaskId};
use taskhub_core::user::{Principal, UserId};

use crate::store::{GrantStore, TaskStore, UserStore};

/// A task together with its caller-visible grant list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetail {
    /// The task record.
    #[serde(flatten)]
    pub task: Task,
    /// All grants on the task.
    pub grants: Vec<Grant>,
}

/// One target of a share request: a user and the level to grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareTarget {
    /// The user to share with.
    pub user_id: UserId,
    /// The permission level to grant.
    pub permission: Permission,
}

/// Outcome of a batch share: which upserts applied and which failed.
///
/// A batch is a sequence of independent upserts, not a transaction --
/// upserts committed before a failure stay committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareBatchOutcome {
    /// Number of grants successfully upserted.
    pub applied: usize,
    /// Targets that failed, with the failure for each.
    pub failures: Vec<ShareFailure>,
}

/// A single failed upsert within a batch share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareFailure {
    /// The target user whose upsert failed.
    pub user_id: UserId,
    /// Why the upsert failed.
    pub error: OpsError,
}

/// Orchestrates task lifecycle and sharing against the stores.
///
/// The stores are shared with the account service but mutated for
/// task/grant records only through this service.
#[derive(Clone)]
pub struct TaskOps {
    tasks: Arc<TaskStore>,
    grants: Arc<GrantStore>,
    users: Arc<UserStore>,
}

impl TaskOps {
    /// Creates a task operations service over the given stores.
    #[must_use]
    pub const fn new(tasks: Arc<TaskStore>, grants: Arc<GrantStore>, users: Arc<UserStore>) -> Self {
        Self {
            tasks,
            grants,
            users,
        }
    }

    /// Loads a task and its grants, or `NotFound`.
    async fn load(&self, task_id: TaskId) -> Result<(Task, Vec<Grant>), OpsError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await
            .ok_or_else(OpsError::task_not_found)?;
        let grants = self.grants.find_by_task(task_id).await;
        Ok((task, grants))
    }

    /// Returns a task with its grant list if the caller may view it.
    ///
    /// # Errors
    ///
    /// `NotFound` if the task does not exist; `Forbidden` if the caller
    /// is not the owner, an admin, or a grant holder.
    pub async fn get_task(
        &self,
        principal: &Principal,
        task_id: TaskId,
    ) -> Result<TaskDetail, OpsError> {
        let (task, grants) = self.load(task_id).await?;

        if !authz::decide(principal, &task, &grants, Action::View).is_allowed() {
            return Err(OpsError::denied());
        }

        Ok(TaskDetail { task, grants })
    }

    /// Returns all tasks owned by the caller, each with its grants.
    ///
    /// Only ownership confers listing; tasks shared with the caller do
    /// not appear here.
    pub async fn list_owned(&self, principal: &Principal) -> Vec<TaskDetail> {
        let owned = self.tasks.find_by_reporter(principal.user_id).await;
        let mut details = Vec::with_capacity(owned.len());
        for task in owned {
            let grants = self.grants.find_by_task(task.id).await;
            details.push(TaskDetail { task, grants });
        }
        details
    }

    /// Creates a task owned by the caller.
    ///
    /// Always allowed for any authenticated principal. The service
    /// stamps the identifier, reporter, and creation time.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the title is empty or too long.
    pub async fn create_task(
        &self,
        principal: &Principal,
        fields: TaskFields,
    ) -> Result<Task, OpsError> {
        validate_fields(&fields)?;

        let task = Task::create(principal.user_id, fields);
        tracing::info!(task_id = %task.id, reporter = %principal.user_id, "task created");
        self.tasks.insert(task.clone()).await;
        Ok(task)
    }

    /// Applies caller-supplied fields to an existing task.
    ///
    /// # Errors
    ///
    /// `NotFound` if the task does not exist; `Forbidden` unless the
    /// caller is the owner, an admin, or holds a `ReadWrite` grant;
    /// `InvalidInput` on a bad field set.
    pub async fn update_task(
        &self,
        principal: &Principal,
        task_id: TaskId,
        fields: TaskFields,
    ) -> Result<Task, OpsError> {
        let (mut task, grants) = self.load(task_id).await?;

        let has_edit_permission =
            authz::decide(principal, &task, &grants, Action::Edit).is_allowed();
        if !has_edit_permission {
            return Err(OpsError::denied());
        }

        validate_fields(&fields)?;
        task.apply(fields);
        tracing::info!(task_id = %task.id, editor = %principal.user_id, "task updated");
        self.tasks.update(task.clone()).await;
        Ok(task)
    }

    /// Deletes a task and cascade-deletes its grants.
    ///
    /// # Errors
    ///
    /// `NotFound` if the task does not exist; `Forbidden` unless the
    /// caller is the owner or an admin -- grants never authorize
    /// deletion.
    pub async fn delete_task(&self, principal: &Principal, task_id: TaskId) -> Result<(), OpsError> {
        let (task, grants) = self.load(task_id).await?;

        if !authz::decide(principal, &task, &grants, Action::Delete).is_allowed() {
            return Err(OpsError::denied());
        }

        self.tasks.delete(task_id).await;
        self.grants.remove_task(task_id).await;
        tracing::info!(task_id = %task_id, deleter = %principal.user_id, "task deleted");
        Ok(())
    }

    /// Shares a task with one user, creating or overwriting the grant
    /// for the (task, user) pair.
    ///
    /// # Errors
    ///
    /// `NotFound` if the task or the target user does not exist;
    /// `Forbidden` unless the caller is the owner or an admin -- grants
    /// never authorize re-sharing.
    pub async fn share_task(
        &self,
        principal: &Principal,
        task_id: TaskId,
        target: ShareTarget,
    ) -> Result<(), OpsError> {
        let (task, grants) = self.load(task_id).await?;

        if !authz::decide(principal, &task, &grants, Action::Share).is_allowed() {
            return Err(OpsError::denied());
        }

        self.upsert_grant(task_id, target).await?;
        tracing::info!(
            task_id = %task_id,
            target = %target.user_id,
            permission = %target.permission,
            "task shared"
        );
        Ok(())
    }

    /// Shares a task with multiple users in one call.
    ///
    /// The authorization gate runs once for the task; each target is
    /// then an independent upsert. A failed target does not roll back
    /// targets already applied.
    ///
    /// # Errors
    ///
    /// `NotFound` if the task does not exist; `Forbidden` unless the
    /// caller is the owner or an admin. Per-target failures are
    /// reported in the returned [`ShareBatchOutcome`], not as an error.
    pub async fn share_task_batch(
        &self,
        principal: &Principal,
        task_id: TaskId,
        targets: Vec<ShareTarget>,
    ) -> Result<ShareBatchOutcome, OpsError> {
        let (task, grants) = self.load(task_id).await?;

        if !authz::decide(principal, &task, &grants, Action::Share).is_allowed() {
            return Err(OpsError::denied());
        }

        let mut outcome = ShareBatchOutcome {
            applied: 0,
            failures: Vec::new(),
        };
        for target in targets {
            match self.upsert_grant(task_id, target).await {
                Ok(()) => outcome.applied += 1,
                Err(error) => {
                    tracing::warn!(
                        task_id = %task_id,
                        target = %target.user_id,
                        error = %error,
                        "batch share target failed"
                    );
                    outcome.failures.push(ShareFailure {
                        user_id: target.user_id,
                        error,
                    });
                }
            }
        }
        tracing::info!(
            task_id = %task_id,
            applied = outcome.applied,
            failed = outcome.failures.len(),
            "batch share finished"
        );
        Ok(outcome)
    }

    /// Upserts one grant after checking the target account exists.
    async fn upsert_grant(&self, task_id: TaskId, target: ShareTarget) -> Result<(), OpsError> {
        if self.users.find_by_id(target.user_id).await.is_none() {
            return Err(OpsError::user_not_found());
        }
        self.grants
            .upsert(task_id, target.user_id, target.permission)
            .await;
        Ok(())
    }
}

/// Validates a caller-supplied field set.
fn validate_fields(fields: &TaskFields) -> Result<(), OpsError> {
    if fields.title.trim().is_empty() {
        return Err(OpsError::InvalidInput("title is required".to_string()));
    }
    if fields.title.chars().count() > taskhub_core::task::MAX_TITLE_LENGTH {
        return Err(OpsError::InvalidInput(format!(
            "title exceeds {} characters",
            taskhub_core::task::MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}
