//! Port abstraction for user persistence adapters and their errors.
//!
//! Each method is a single round trip to the store. Username uniqueness and
//! the one-tree-per-user binding are enforced by the adapter atomically, not
//! by a read followed by a write.

use async_trait::async_trait;

use crate::domain::{EmailAddress, LinktreeId, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        AlreadyExists { username: String } => "user {username} already exists",
        /// The user id does not resolve.
        NotFound { id: UserId } => "user {id} not found",
        /// The user already owns a linktree.
        AlreadyBound { id: UserId } => "user {id} already owns a linktree",
    }
}

/// Insert payload for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Server-generated identifier.
    pub id: UserId,
    /// Unique handle.
    pub username: Username,
    /// Contact address.
    pub email: EmailAddress,
    /// PHC-formatted password hash.
    pub password_hash: String,
}

/// A user together with the stored password hash, for credential checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Account record.
    pub user: User,
    /// PHC-formatted password hash.
    pub password_hash: String,
}

/// Port for user storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with [`UserPersistenceError::AlreadyExists`] when
    /// the username is taken, even under concurrent signups.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user and password hash by exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Record `linktree_id` as the tree owned by `user_id`, only when the user
    /// does not own one yet. Returns the refreshed user.
    async fn bind_linktree(
        &self,
        user_id: &UserId,
        linktree_id: &LinktreeId,
    ) -> Result<User, UserPersistenceError>;
}
