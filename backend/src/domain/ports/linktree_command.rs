//! Driving ports for linktree mutations and reads.
//!
//! Every command receives the verified caller id from the inbound adapter;
//! no ambient "current user" exists anywhere in the process.

use async_trait::async_trait;

use crate::domain::{
    Error, LinkDraft, LinkFields, LinkId, LinkMatch, Linktree, LinktreeId, ProfileText, UserId,
};

/// Payload for creating a caller's linktree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLinktree {
    /// Initial full name.
    pub fullname: ProfileText,
    /// Initial biography.
    pub bio: ProfileText,
    /// Initial links; identifiers are assigned on creation.
    pub links: Vec<LinkDraft>,
}

/// Identity-scoped mutations of a linktree.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinktreeCommand: Send + Sync {
    /// Create a tree and bind it to `actor`.
    async fn create_linktree(&self, actor: &UserId, tree: NewLinktree) -> Result<Linktree, Error>;

    /// Append a link to the actor's tree.
    async fn add_link(
        &self,
        actor: &UserId,
        tree_id: &LinktreeId,
        draft: LinkDraft,
    ) -> Result<Linktree, Error>;

    /// Overwrite the first link matching `selector`.
    async fn update_link(
        &self,
        actor: &UserId,
        tree_id: &LinktreeId,
        selector: LinkMatch,
        fields: LinkFields,
    ) -> Result<Linktree, Error>;

    /// Remove a link by identifier.
    async fn delete_link(
        &self,
        actor: &UserId,
        tree_id: &LinktreeId,
        link_id: &LinkId,
    ) -> Result<Linktree, Error>;

    /// Replace the biography.
    async fn set_bio(
        &self,
        actor: &UserId,
        tree_id: &LinktreeId,
        bio: ProfileText,
    ) -> Result<Linktree, Error>;

    /// Replace the full name.
    async fn set_fullname(
        &self,
        actor: &UserId,
        tree_id: &LinktreeId,
        fullname: ProfileText,
    ) -> Result<Linktree, Error>;
}

/// Read access to linktrees, open to any authenticated caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinktreeQuery: Send + Sync {
    /// Fetch one tree.
    async fn get_linktree(&self, tree_id: &LinktreeId) -> Result<Linktree, Error>;

    /// Fetch every tree.
    async fn list_linktrees(&self) -> Result<Vec<Linktree>, Error>;
}
