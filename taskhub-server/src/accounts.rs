//! User account service: registration, login, and admin management.
//!
//! Registration is open to anyone; listing, lookup, and deletion of
//! accounts are admin-only. Deleting an account that still owns tasks
//! is refused -- ownership is a protected relationship, and tasks are
//! never orphaned or silently reassigned.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use taskhub_core::error::OpsError;
use taskhub_core::user::{Principal, Role, User, UserId};

use crate::auth::{hash_password, verify_password};
use crate::store::{GrantStore, TaskStore, UserStore};

/// The outward-facing projection of a user account.
///
/// The stored password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique account identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Global role.
    pub role: Role,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Manages user accounts against the user store.
#[derive(Clone)]
pub struct Accounts {
    users: Arc<UserStore>,
    tasks: Arc<TaskStore>,
    grants: Arc<GrantStore>,
}

impl Accounts {
    /// Creates an account service over the given stores.
    #[must_use]
    pub const fn new(users: Arc<UserStore>, tasks: Arc<TaskStore>, grants: Arc<GrantStore>) -> Self {
        Self {
            users,
            tasks,
            grants,
        }
    }

    /// Registers a new account with the [`Role::User`] role.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the username or password is empty; `Conflict`
    /// if the username is already taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<UserProfile, OpsError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(OpsError::InvalidInput("username is required".to_string()));
        }
        if password.is_empty() {
            return Err(OpsError::InvalidInput("password is required".to_string()));
        }

        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            password_hash: hash_password(password),
            role: Role::User,
        };

        self.users
            .insert(user.clone())
            .await
            .map_err(|_| OpsError::Conflict("username already exists".to_string()))?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user.into())
    }

    /// Verifies a username/password pair, returning the account on
    /// success and `None` on any mismatch.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Option<User> {
        let user = self.users.find_by_username(username).await?;
        if verify_password(password, &user.password_hash) {
            Some(user)
        } else {
            None
        }
    }

    /// Returns one account's profile. Admin-only.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admin callers; `NotFound` if the account
    /// does not exist.
    pub async fn get_user(
        &self,
        principal: &Principal,
        user_id: UserId,
    ) -> Result<UserProfile, OpsError> {
        require_admin(principal)?;
        self.users
            .find_by_id(user_id)
            .await
            .map(UserProfile::from)
            .ok_or_else(OpsError::user_not_found)
    }

    /// Returns all account profiles. Admin-only.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admin callers.
    pub async fn list_users(&self, principal: &Principal) -> Result<Vec<UserProfile>, OpsError> {
        require_admin(principal)?;
        Ok(self
            .users
            .list()
            .await
            .into_iter()
            .map(UserProfile::from)
            .collect())
    }

    /// Deletes an account. Admin-only.
    ///
    /// The deleted user's received grants are removed so no grant
    /// references a missing account. Their owned tasks are not touched
    /// -- an account that still owns tasks cannot be deleted.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admin callers; `NotFound` if the account
    /// does not exist; `Conflict` if the account still owns tasks.
    pub async fn delete_user(&self, principal: &Principal, user_id: UserId) -> Result<(), OpsError> {
        require_admin(principal)?;

        if self.users.find_by_id(user_id).await.is_none() {
            return Err(OpsError::user_not_found());
        }
        if self.tasks.any_owned_by(user_id).await {
            return Err(OpsError::Conflict(
                "user still owns tasks and cannot be deleted".to_string(),
            ));
        }

        self.users.delete(user_id).await;
        self.grants.remove_user(user_id).await;
        tracing::info!(user_id = %user_id, "user deleted");
        Ok(())
    }

    /// Inserts an admin account with the given credentials if the
    /// username is free. Used to seed the configured admin at startup.
    ///
    /// # Errors
    ///
    /// `Conflict` if the username is already taken.
    pub async fn seed_admin(&self, username: &str, password: &str) -> Result<UserProfile, OpsError> {
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            password_hash: hash_password(password),
            role: Role::Admin,
        };
        self.users
            .insert(user.clone())
            .await
            .map_err(|_| OpsError::Conflict("username already exists".to_string()))?;
        tracing::info!(username = %user.username, "admin account seeded");
        Ok(user.into())
    }
}

/// Fails with `Forbidden` unless the principal holds the admin role.
fn require_admin(principal: &Principal) -> Result<(), OpsError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(OpsError::denied())
    }
}
