//! Builders wiring repositories and services into [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use linktree::domain::ports::{LinktreeRepository, UserRepository};
use linktree::domain::{AccountService, LinktreeService, TokenAuthority};
use linktree::inbound::http::state::HttpState;
use linktree::outbound::memory::InMemoryDocumentStore;
use linktree::outbound::persistence::{DieselLinktreeRepository, DieselUserRepository};
use linktree::outbound::security::Argon2CredentialHasher;

use super::ServerConfig;

/// Wire both services over one pair of repositories.
fn assemble<U, L>(users: Arc<U>, trees: Arc<L>, tokens: TokenAuthority) -> HttpState
where
    U: UserRepository + 'static,
    L: LinktreeRepository + 'static,
{
    let hasher = Arc::new(Argon2CredentialHasher::default());
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&users),
        hasher,
        tokens.clone(),
    ));
    let linktrees = Arc::new(LinktreeService::new(users, trees));
    HttpState::new(accounts, linktrees.clone(), linktrees, tokens)
}

/// Build handler state from the configured store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => assemble(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselLinktreeRepository::new(pool.clone())),
            config.tokens.clone(),
        ),
        None => {
            warn!("no database configured; documents live in process memory only");
            let store = Arc::new(InMemoryDocumentStore::new());
            assemble(Arc::clone(&store), store, config.tokens.clone())
        }
    };
    web::Data::new(state)
}
