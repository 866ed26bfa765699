//! User accounts and the request principal.
//!
//! A [`User`] is the stored account record; a [`Principal`] is the
//! authenticated identity a request acts as. Services never read
//! identity from ambient context -- every operation takes a
//! `Principal` argument explicitly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user account, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new time-ordered user identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `UserId` from an existing UUID.
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

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Global role of a user account.
///
/// A closed two-value tag: there is no promotion path after
/// registration, and no role hierarchy beyond Admin superseding User.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Regular account; rights come from ownership and grants only.
    #[default]
    User,
    /// Administrator; authorized for every action on every task.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique account identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Salted hash of the account password. Never the plaintext.
    pub password_hash: String,
    /// Global role, fixed at registration.
    pub role: Role,
}

impl User {
    /// Returns the principal this account acts as when authenticated.
    #[must_use]
    pub const fn principal(&self) -> Principal {
        Principal {
            user_id: self.id,
            role: self.role,
        }
    }
}

/// The authenticated identity making a request.
///
/// Carries only what authorization decisions need: who the caller is
/// and whether they hold the admin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Identifier of the authenticated user.
    pub user_id: UserId,
    /// Global role of the authenticated user.
    pub role: Role,
}

impl Principal {
    /// Creates a principal for the given user id and role.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Returns `true` if this principal holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
