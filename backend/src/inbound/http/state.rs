//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::TokenAuthority;
use crate::domain::ports::{AccountCommand, LinktreeCommand, LinktreeQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Signup and login.
    pub accounts: Arc<dyn AccountCommand>,
    /// Identity-scoped tree mutations.
    pub linktrees: Arc<dyn LinktreeCommand>,
    /// Tree reads.
    pub linktrees_query: Arc<dyn LinktreeQuery>,
    /// Authority the token gate verifies against.
    pub tokens: TokenAuthority,
}

impl HttpState {
    /// Bundle the ports and the token authority.
    pub fn new(
        accounts: Arc<dyn AccountCommand>,
        linktrees: Arc<dyn LinktreeCommand>,
        linktrees_query: Arc<dyn LinktreeQuery>,
        tokens: TokenAuthority,
    ) -> Self {
        Self {
            accounts,
            linktrees,
            linktrees_query,
            tokens,
        }
    }
}
