//! Port for account persistence and family-code lookups.
//!
//! The family directory is derived from this table: there is no stored group
//! entity, so membership queries always read the codes as they are now.

use async_trait::async_trait;

use crate::domain::{FamilyCode, User, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the username.
        DuplicateUsername { username: String } => "username {username} is already registered",
    }
}

/// Port for storing accounts and resolving family membership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// Fails with [`UserPersistenceError::DuplicateUsername`] when the
    /// username is taken; existing rows are never overwritten.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch an account by username. Unknown users yield `None`.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Overwrite the family code of an account.
    ///
    /// Returns `false` when no account matched.
    async fn set_family_code(
        &self,
        username: &Username,
        code: FamilyCode,
    ) -> Result<bool, UserPersistenceError>;

    /// Usernames currently holding `code`, in registration order.
    async fn list_family_members(
        &self,
        code: FamilyCode,
    ) -> Result<Vec<Username>, UserPersistenceError>;
}
