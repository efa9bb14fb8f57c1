//! Linktree domain service implementing the mutation and query ports.
//!
//! Mutations resolve the caller, check that the caller owns the target tree,
//! then invoke exactly one repository primitive and return the document it
//! produced. Reads are open to any authenticated caller.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::account_service::map_user_error;
use crate::domain::ports::{
    LinktreeCommand, LinktreePersistenceError, LinktreeQuery, LinktreeRepository, NewLinktree,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, Link, LinkDraft, LinkFields, LinkId, LinkMatch, Linktree, LinktreeId, ProfileText,
    UserId,
};

/// Linktree service over user and linktree repositories.
#[derive(Clone)]
pub struct LinktreeService<U, L> {
    users: Arc<U>,
    trees: Arc<L>,
}

impl<U, L> LinktreeService<U, L> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, trees: Arc<L>) -> Self {
        Self { users, trees }
    }
}

impl<U, L> LinktreeService<U, L>
where
    U: UserRepository,
    L: LinktreeRepository,
{
    /// Ensure `actor` owns `tree_id`.
    ///
    /// A tree the caller does not own yields 404 when it does not exist and
    /// 403 when it belongs to someone else.
    async fn authorize(&self, actor: &UserId, tree_id: &LinktreeId) -> Result<(), Error> {
        let user = self
            .users
            .find_by_id(actor)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        if user.owns(*tree_id) {
            return Ok(());
        }
        match self.trees.get(tree_id).await.map_err(map_tree_error)? {
            Some(_) => Err(Error::forbidden("linktree belongs to another user")),
            None => Err(tree_not_found()),
        }
    }
}

#[async_trait]
impl<U, L> LinktreeCommand for LinktreeService<U, L>
where
    U: UserRepository,
    L: LinktreeRepository,
{
    async fn create_linktree(&self, actor: &UserId, tree: NewLinktree) -> Result<Linktree, Error> {
        let user = self
            .users
            .find_by_id(actor)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        if user.linktree_id().is_some() {
            return Err(map_user_error(UserPersistenceError::already_bound(*actor)));
        }

        let NewLinktree {
            fullname,
            bio,
            links,
        } = tree;
        let created = self
            .trees
            .create(&Linktree::create(&fullname, &bio, links))
            .await
            .map_err(map_tree_error)?;

        match self.users.bind_linktree(actor, &created.id()).await {
            Ok(_) => {
                info!(user_id = %actor, linktree_id = %created.id(), "linktree created");
                Ok(created)
            }
            Err(err) => {
                // Lost a race with a concurrent create for the same user.
                warn!(
                    user_id = %actor,
                    linktree_id = %created.id(),
                    error = %err,
                    "linktree created but not bound; leaving orphan"
                );
                Err(map_user_error(err))
            }
        }
    }

    async fn add_link(
        &self,
        actor: &UserId,
        tree_id: &LinktreeId,
        draft: LinkDraft,
    ) -> Result<Linktree, Error> {
        self.authorize(actor, tree_id).await?;
        self.trees
            .push_link(tree_id, &Link::from_draft(draft))
            .await
            .map_err(map_tree_error)
    }

    async fn update_link(
        &self,
        actor: &UserId,
        tree_id: &LinktreeId,
        selector: LinkMatch,
        fields: LinkFields,
    ) -> Result<Linktree, Error> {
        self.authorize(actor, tree_id).await?;
        self.trees
            .replace_link_fields(tree_id, &selector, &fields)
            .await
            .map_err(map_tree_error)
    }

    async fn delete_link(
        &self,
        actor: &UserId,
        tree_id: &LinktreeId,
        link_id: &LinkId,
    ) -> Result<Linktree, Error> {
        self.authorize(actor, tree_id).await?;
        self.trees
            .remove_link(tree_id, link_id)
            .await
            .map_err(map_tree_error)
    }

    async fn set_bio(
        &self,
        actor: &UserId,
        tree_id: &LinktreeId,
        bio: ProfileText,
    ) -> Result<Linktree, Error> {
        self.authorize(actor, tree_id).await?;
        self.trees
            .set_bio(tree_id, &bio)
            .await
            .map_err(map_tree_error)
    }

    async fn set_fullname(
        &self,
        actor: &UserId,
        tree_id: &LinktreeId,
        fullname: ProfileText,
    ) -> Result<Linktree, Error> {
        self.authorize(actor, tree_id).await?;
        self.trees
            .set_fullname(tree_id, &fullname)
            .await
            .map_err(map_tree_error)
    }
}

#[async_trait]
impl<U, L> LinktreeQuery for LinktreeService<U, L>
where
    U: UserRepository,
    L: LinktreeRepository,
{
    async fn get_linktree(&self, tree_id: &LinktreeId) -> Result<Linktree, Error> {
        self.trees
            .get(tree_id)
            .await
            .map_err(map_tree_error)?
            .ok_or_else(tree_not_found)
    }

    async fn list_linktrees(&self) -> Result<Vec<Linktree>, Error> {
        self.trees.list().await.map_err(map_tree_error)
    }
}

fn tree_not_found() -> Error {
    Error::not_found("linktree not found")
}

fn map_tree_error(error: LinktreePersistenceError) -> Error {
    match error {
        LinktreePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("linktree repository unavailable: {message}"))
        }
        LinktreePersistenceError::Query { message } => {
            Error::internal(format!("linktree repository error: {message}"))
        }
        LinktreePersistenceError::NotFound { .. } => tree_not_found(),
        LinktreePersistenceError::LinkNotFound => Error::invalid_request("link not found in linktree")
            .with_details(json!({ "code": "link_not_found" })),
    }
}
