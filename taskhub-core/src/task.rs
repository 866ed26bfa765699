//! Task records and the caller-supplied field set.
//!
//! A [`Task`] is owned by exactly one reporter, fixed at creation.
//! Callers create and update tasks through [`TaskFields`], which
//! carries only the mutable fields -- the identifier, reporter, and
//! creation timestamp are stamped by the service and never change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserId;

/// Maximum allowed task title length in characters.
pub const MAX_TITLE_LENGTH: usize = 256;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority of a task. Caller-supplied; no ordering rules are enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority (the default for new tasks).
    #[default]
    Medium,
    /// High priority.
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Workflow status of a task.
///
/// Any value may move to any other value; there are no enforced
/// transition rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Not started (the default for new tasks).
    #[default]
    ToDo,
    /// Actively being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToDo => write!(f, "to_do"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// A stored task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier (UUID v7, time-ordered).
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Caller-supplied priority.
    pub priority: Priority,
    /// Caller-supplied workflow status.
    pub status: Status,
    /// When the task was created. Set once, never updated.
    pub created_at: DateTime<Utc>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// The owning reporter. Fixed at creation, never reassigned.
    pub reporter_id: UserId,
}

impl Task {
    /// Creates a new task owned by `reporter_id` from the given fields,
    /// generating a fresh identifier and stamping the creation time.
    #[must_use]
    pub fn create(reporter_id: UserId, fields: TaskFields) -> Self {
        Self {
            id: TaskId::new(),
            title: fields.title,
            description: fields.description,
            priority: fields.priority,
            status: fields.status,
            created_at: Utc::now(),
            due_date: fields.due_date,
            reporter_id,
        }
    }

    /// Applies caller-supplied fields to this task.
    ///
    /// The identifier, reporter, and creation timestamp are not part of
    /// [`TaskFields`] and therefore cannot change.
    pub fn apply(&mut self, fields: TaskFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.priority = fields.priority;
        self.status = fields.status;
        self.due_date = fields.due_date;
    }
}

/// The caller-mutable fields of a task, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    /// Task title. Required, non-empty.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Priority, defaulting to [`Priority::Medium`].
    #[serde(default)]
    pub priority: Priority,
    /// Status, defaulting to [`Status::ToDo`].
    #[serde(default)]
    pub status: Status,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
}
