//! In-memory task, grant, and user stores.
//!
//! Thin persistence adapters behind the operations services. All three
//! are thread-safe via [`RwLock`] and hold plain `HashMap`s; records
//! are lost on restart. The stores never make authorization decisions
//! -- they are mutated exclusively through the services in
//! [`crate::ops`] and [`crate::accounts`]. Concurrent writes to the
//! same record resolve last-write-wins; there are no version tokens.

use std::collections::HashMap;

use taskhub_core::grant::{Grant, Permission};
use taskhub_core::task::{Task, TaskId};
use taskhub_core::user::{User, UserId};
use tokio::sync::RwLock;

/// In-memory task records keyed by [`TaskId`].
#[derive(Default)]
pub struct TaskStore {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl TaskStore {
    /// Creates a new, empty task store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the task with the given id, if it exists.
    pub async fn find_by_id(&self, id: TaskId) -> Option<Task> {
        let tasks = self.tasks.read().await;
        tasks.get(&id).cloned()
    }

    /// Returns all tasks owned by the given reporter.
    pub async fn find_by_reporter(&self, reporter_id: UserId) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|t| t.reporter_id == reporter_id)
            .cloned()
            .collect();
        // UUID v7 ids are time-ordered, so this is creation order.
        owned.sort_by_key(|t| *t.id.as_uuid());
        owned
    }

    /// Returns `true` if the given reporter owns at least one task.
    pub async fn any_owned_by(&self, reporter_id: UserId) -> bool {
        let tasks = self.tasks.read().await;
        tasks.values().any(|t| t.reporter_id == reporter_id)
    }

    /// Inserts a new task record.
    pub async fn insert(&self, task: Task) {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task);
    }

    /// Replaces an existing task record. Last write wins across
    /// concurrent updates of the same id.
    pub async fn update(&self, task: Task) {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task);
    }

    /// Deletes a task record, returning `true` if it existed.
    pub async fn delete(&self, id: TaskId) -> bool {
        let mut tasks = self.tasks.write().await;
        tasks.remove(&id).is_some()
    }
}

/// In-memory sharing grants keyed by (task, user).
///
/// The key shape enforces the at-most-one-grant-per-pair invariant:
/// upserting the same pair overwrites, never duplicates.
#[derive(Default)]
pub struct GrantStore {
    grants: RwLock<HashMap<(TaskId, UserId), Grant>>,
}

impl GrantStore {
    /// Creates a new, empty grant store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the grant for the given (task, user) pair, if any.
    pub async fn find_by_task_and_user(&self, task_id: TaskId, user_id: UserId) -> Option<Grant> {
        let grants = self.grants.read().await;
        grants.get(&(task_id, user_id)).cloned()
    }

    /// Returns all grants on the given task.
    pub async fn find_by_task(&self, task_id: TaskId) -> Vec<Grant> {
        let grants = self.grants.read().await;
        let mut on_task: Vec<Grant> = grants
            .values()
            .filter(|g| g.task_id == task_id)
            .cloned()
            .collect();
        on_task.sort_by_key(|g| (g.shared_at, *g.user_id.as_uuid()));
        on_task
    }

    /// Creates or overwrites the grant for (task, user).
    ///
    /// On overwrite the permission level changes but the original
    /// `shared_at` timestamp is preserved.
    pub async fn upsert(&self, task_id: TaskId, user_id: UserId, permission: Permission) {
        let mut grants = self.grants.write().await;
        grants
            .entry((task_id, user_id))
            .and_modify(|g| g.permission = permission)
            .or_insert_with(|| Grant::new(task_id, user_id, permission));
    }

    /// Removes every grant on the given task (cascade on task delete).
    pub async fn remove_task(&self, task_id: TaskId) {
        let mut grants = self.grants.write().await;
        grants.retain(|(tid, _), _| *tid != task_id);
    }

    /// Removes every grant held by the given user (cleanup on user
    /// delete, so no grant references a missing account).
    pub async fn remove_user(&self, user_id: UserId) {
        let mut grants = self.grants.write().await;
        grants.retain(|(_, uid), _| *uid != user_id);
    }
}

/// Error returned when inserting a user with a taken username.
#[derive(Debug, thiserror::Error)]
#[error("username already exists")]
pub struct UsernameTaken;

/// In-memory user accounts keyed by [`UserId`], with unique usernames.
#[derive(Default)]
pub struct UserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl UserStore {
    /// Creates a new, empty user store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user with the given id, if it exists.
    pub async fn find_by_id(&self, id: UserId) -> Option<User> {
        let users = self.users.read().await;
        users.get(&id).cloned()
    }

    /// Returns the user with the given username, if it exists.
    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        let users = self.users.read().await;
        users.values().find(|u| u.username == username).cloned()
    }

    /// Returns all user accounts.
    pub async fn list(&self) -> Vec<User> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| *u.id.as_uuid());
        all
    }

    /// Inserts a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`UsernameTaken`] if another account already holds the
    /// username.
    pub async fn insert(&self, user: User) -> Result<(), UsernameTaken> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(UsernameTaken);
        }
        users.insert(user.id, user);
        Ok(())
    }

    /// Deletes a user account, returning `true` if it existed.
    pub async fn delete(&self, id: UserId) -> bool {
        let mut users = self.users.write().await;
        users.remove(&id).is_some()
    }
}
