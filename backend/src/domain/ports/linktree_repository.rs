//! Port for linktree documents and their atomic link primitives.
//!
//! Every mutating method applies exactly one change to one document in one
//! store operation and returns the document as it stands after that change.
//! Concurrent mutations of different links in the same tree must both land.

use async_trait::async_trait;

use crate::domain::{Link, LinkFields, LinkId, LinkMatch, Linktree, LinktreeId, ProfileText};

use super::define_port_error;

define_port_error! {
    /// Errors raised by linktree repository adapters.
    pub enum LinktreePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "linktree repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "linktree repository query failed: {message}",
        /// The tree does not exist.
        NotFound { id: LinktreeId } => "linktree {id} not found",
        /// The tree exists but holds no matching link.
        LinkNotFound => "link not found in linktree",
    }
}

/// Port for linktree storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinktreeRepository: Send + Sync {
    /// Insert a new tree.
    async fn create(&self, tree: &Linktree) -> Result<Linktree, LinktreePersistenceError>;

    /// Fetch a tree by identifier.
    async fn get(&self, id: &LinktreeId) -> Result<Option<Linktree>, LinktreePersistenceError>;

    /// Fetch every tree.
    async fn list(&self) -> Result<Vec<Linktree>, LinktreePersistenceError>;

    /// Append `link` to the tree's links.
    async fn push_link(
        &self,
        id: &LinktreeId,
        link: &Link,
    ) -> Result<Linktree, LinktreePersistenceError>;

    /// Overwrite name, target, and visits of the first link matching
    /// `selector`, leaving every other link untouched.
    async fn replace_link_fields(
        &self,
        id: &LinktreeId,
        selector: &LinkMatch,
        fields: &LinkFields,
    ) -> Result<Linktree, LinktreePersistenceError>;

    /// Remove the link with `link_id`.
    async fn remove_link(
        &self,
        id: &LinktreeId,
        link_id: &LinkId,
    ) -> Result<Linktree, LinktreePersistenceError>;

    /// Replace the biography.
    async fn set_bio(
        &self,
        id: &LinktreeId,
        bio: &ProfileText,
    ) -> Result<Linktree, LinktreePersistenceError>;

    /// Replace the full name.
    async fn set_fullname(
        &self,
        id: &LinktreeId,
        fullname: &ProfileText,
    ) -> Result<Linktree, LinktreePersistenceError>;
}
