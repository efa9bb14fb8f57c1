//! Driving port for signup and login.
//!
//! Inbound adapters call this port without knowing how users are stored or
//! how tokens are signed, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, IssuedToken, LoginCredentials, Registration, User, UserId};

/// A newly registered user and the token issued for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUpAccount {
    /// The created account.
    pub user: User,
    /// Token proving the new identity.
    pub token: IssuedToken,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedIn {
    /// Authenticated user.
    pub user_id: UserId,
    /// Fresh token for the user.
    pub token: IssuedToken,
}

/// Domain use-case port for account lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a new account and issue its first token.
    async fn signup(&self, registration: &Registration) -> Result<SignedUpAccount, Error>;

    /// Check credentials and issue a fresh token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoggedIn, Error>;
}
