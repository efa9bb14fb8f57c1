//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use crate::domain::ports::{MockAccountCommand, MockLinktreeCommand, MockLinktreeQuery};
use crate::domain::{EmailAddress, SigningSecret, TokenAuthority, TokenSubject, UserId, Username};

use super::state::HttpState;

/// Authority signing with a fixed test secret and the wall clock.
pub fn test_tokens() -> TokenAuthority {
    let secret = SigningSecret::new(vec![42_u8; 32]).expect("test secret");
    TokenAuthority::new(&secret, Arc::new(DefaultClock))
}

/// Issue a valid token for `user_id`.
pub fn token_for(tokens: &TokenAuthority, user_id: UserId) -> String {
    let subject = TokenSubject {
        user_id,
        username: Username::new("ada").expect("username"),
        email: EmailAddress::new("ada@example.com").expect("email"),
    };
    tokens.issue_default(&subject).expect("issue").token
}

/// Port doubles that tests configure before building state.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub linktrees: MockLinktreeCommand,
    pub linktrees_query: MockLinktreeQuery,
}

impl MockPorts {
    /// Bundle the doubles with `tokens` into handler state.
    pub fn into_state(self, tokens: TokenAuthority) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.accounts),
            Arc::new(self.linktrees),
            Arc::new(self.linktrees_query),
            tokens,
        ))
    }
}
