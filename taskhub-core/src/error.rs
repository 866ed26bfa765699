//! Error taxonomy shared by every `TaskHub` operation.

use serde::{Deserialize, Serialize};

/// Typed outcome for failed operations.
///
/// Every denial surfaces as [`OpsError::Forbidden`]; no operation maps
/// a denial to a different variant or silently omits data instead.
/// [`OpsError::Conflict`] is not produced by task operations today --
/// the account layer uses it for protected-relationship violations,
/// and it is otherwise reserved for optimistic-concurrency support.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum OpsError {
    /// The referenced task or user does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The caller is not authorized for the requested action.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// The request data is malformed or incomplete.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The request conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl OpsError {
    /// A `NotFound` for a missing task.
    #[must_use]
    pub fn task_not_found() -> Self {
        Self::NotFound("task not found".to_string())
    }

    /// A `NotFound` for a missing user.
    #[must_use]
    pub fn user_not_found() -> Self {
        Self::NotFound("user not found".to_string())
    }

    /// A `Forbidden` with the standard denial message.
    #[must_use]
    pub fn denied() -> Self {
        Self::Forbidden("you don't have permission".to_string())
    }
}
