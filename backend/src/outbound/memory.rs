//! Process-local document store.
//!
//! Implements both [`UserRepository`] and [`LinktreeRepository`] over one
//! mutex-guarded state. Every primitive runs inside a single critical section,
//! which gives the same single-document atomicity the PostgreSQL adapter gets
//! from one `UPDATE ... RETURNING` statement. Used when no database is
//! configured and by the HTTP integration tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    LinktreePersistenceError, LinktreeRepository, NewUser, StoredCredentials,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Link, LinkFields, LinkId, LinkMatch, Linktree, LinktreeId, ProfileText, User, UserId, Username,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, StoredCredentials>,
    usernames: HashMap<Username, UserId>,
    trees: HashMap<LinktreeId, Linktree>,
    tree_order: Vec<LinktreeId>,
}

/// In-memory implementation of the user and linktree ports.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    state: Mutex<State>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }

    fn mutate_tree(
        &self,
        id: &LinktreeId,
        apply: impl FnOnce(&mut Linktree) -> bool,
    ) -> Result<Linktree, LinktreePersistenceError> {
        let mut state = self.lock().map_err(LinktreePersistenceError::connection)?;
        let tree = state
            .trees
            .get_mut(id)
            .ok_or_else(|| LinktreePersistenceError::not_found(*id))?;
        if apply(tree) {
            Ok(tree.clone())
        } else {
            Err(LinktreePersistenceError::link_not_found())
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryDocumentStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::connection)?;
        if state.usernames.contains_key(&user.username) {
            return Err(UserPersistenceError::already_exists(user.username.as_str()));
        }
        let created = User::new(user.id, user.username.clone(), user.email.clone());
        state.usernames.insert(user.username.clone(), user.id);
        state.users.insert(
            user.id,
            StoredCredentials {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(created)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(state
            .usernames
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(state.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn bind_linktree(
        &self,
        user_id: &UserId,
        linktree_id: &LinktreeId,
    ) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::connection)?;
        let stored = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| UserPersistenceError::not_found(*user_id))?;
        if stored.user.linktree_id().is_some() {
            return Err(UserPersistenceError::already_bound(*user_id));
        }
        stored.user = stored.user.clone().with_linktree(*linktree_id);
        Ok(stored.user.clone())
    }
}

#[async_trait]
impl LinktreeRepository for InMemoryDocumentStore {
    async fn create(&self, tree: &Linktree) -> Result<Linktree, LinktreePersistenceError> {
        let mut state = self.lock().map_err(LinktreePersistenceError::connection)?;
        if state.trees.contains_key(&tree.id()) {
            return Err(LinktreePersistenceError::query("duplicate linktree id"));
        }
        state.trees.insert(tree.id(), tree.clone());
        state.tree_order.push(tree.id());
        Ok(tree.clone())
    }

    async fn get(&self, id: &LinktreeId) -> Result<Option<Linktree>, LinktreePersistenceError> {
        let state = self.lock().map_err(LinktreePersistenceError::connection)?;
        Ok(state.trees.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Linktree>, LinktreePersistenceError> {
        let state = self.lock().map_err(LinktreePersistenceError::connection)?;
        Ok(state
            .tree_order
            .iter()
            .filter_map(|id| state.trees.get(id).cloned())
            .collect())
    }

    async fn push_link(
        &self,
        id: &LinktreeId,
        link: &Link,
    ) -> Result<Linktree, LinktreePersistenceError> {
        self.mutate_tree(id, |tree| {
            tree.push_link(link.clone());
            true
        })
    }

    async fn replace_link_fields(
        &self,
        id: &LinktreeId,
        selector: &LinkMatch,
        fields: &LinkFields,
    ) -> Result<Linktree, LinktreePersistenceError> {
        self.mutate_tree(id, |tree| tree.replace_link_fields(selector, fields))
    }

    async fn remove_link(
        &self,
        id: &LinktreeId,
        link_id: &LinkId,
    ) -> Result<Linktree, LinktreePersistenceError> {
        self.mutate_tree(id, |tree| tree.remove_link(*link_id))
    }

    async fn set_bio(
        &self,
        id: &LinktreeId,
        bio: &ProfileText,
    ) -> Result<Linktree, LinktreePersistenceError> {
        self.mutate_tree(id, |tree| {
            tree.set_bio(bio);
            true
        })
    }

    async fn set_fullname(
        &self,
        id: &LinktreeId,
        fullname: &ProfileText,
    ) -> Result<Linktree, LinktreePersistenceError> {
        self.mutate_tree(id, |tree| {
            tree.set_fullname(fullname);
            true
        })
    }
}
