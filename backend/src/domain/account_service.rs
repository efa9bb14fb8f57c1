//! Account domain service: signup, credential checks, and token issue.
//!
//! Password hashing is CPU-bound, so hashing and verification run on the
//! blocking pool rather than on an async worker.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, CredentialHashError, CredentialHasher, LoggedIn, NewUser, SignedUpAccount,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, IssuedToken, LoginCredentials, Registration, TokenAuthority, TokenError, TokenSubject,
    User, UserId,
};

/// Message returned for every failed login, whatever the cause.
pub const LOGIN_FAILED_MESSAGE: &str = "invalid username or password";

/// Why a credential check failed.
///
/// The two rejection causes stay distinct for logs and tests but are reported
/// to clients identically.
#[derive(Debug, thiserror::Error)]
pub enum LoginFailure {
    /// No account has the supplied username.
    #[error("unknown user")]
    UnknownUser,
    /// The account exists but the password did not verify.
    #[error("wrong password")]
    WrongPassword,
    /// The check could not be completed.
    #[error(transparent)]
    Unavailable(Error),
}

impl From<LoginFailure> for Error {
    fn from(value: LoginFailure) -> Self {
        match value {
            LoginFailure::UnknownUser | LoginFailure::WrongPassword => {
                Error::invalid_request(LOGIN_FAILED_MESSAGE)
                    .with_details(json!({ "code": "invalid_credentials" }))
            }
            LoginFailure::Unavailable(error) => error,
        }
    }
}

/// Account service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: TokenAuthority,
}

impl<U, H> AccountService<U, H> {
    /// Create a new service over the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: TokenAuthority) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: CredentialHasher + 'static,
{
    /// Resolve the account whose username and password match `credentials`.
    ///
    /// # Errors
    /// Returns [`LoginFailure::UnknownUser`] or [`LoginFailure::WrongPassword`]
    /// on rejection, or [`LoginFailure::Unavailable`] when the store or the
    /// hasher fails.
    pub async fn find_user_by_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<User, LoginFailure> {
        let stored = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(|err| LoginFailure::Unavailable(map_user_error(err)))?
            .ok_or(LoginFailure::UnknownUser)?;

        let password = Zeroizing::new(credentials.password().to_owned());
        let hasher = Arc::clone(&self.hasher);
        let hash = stored.password_hash;
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| {
                LoginFailure::Unavailable(Error::internal(format!(
                    "password verification task failed: {err}"
                )))
            })?
            .map_err(|err| LoginFailure::Unavailable(map_hash_error(err)))?;

        if verified {
            Ok(stored.user)
        } else {
            Err(LoginFailure::WrongPassword)
        }
    }

    async fn hash_password(&self, password: &str) -> Result<String, Error> {
        let password = Zeroizing::new(password.to_owned());
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }

    fn issue_for(&self, user: &User) -> Result<IssuedToken, Error> {
        let subject = TokenSubject {
            user_id: user.id(),
            username: user.username().clone(),
            email: user.email().clone(),
        };
        self.tokens.issue_default(&subject).map_err(map_token_error)
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: CredentialHasher + 'static,
{
    async fn signup(&self, registration: &Registration) -> Result<SignedUpAccount, Error> {
        let password_hash = self.hash_password(registration.password()).await?;
        let new_user = NewUser {
            id: UserId::random(),
            username: registration.username().clone(),
            email: registration.email().clone(),
            password_hash,
        };
        let user = self.users.create(&new_user).await.map_err(map_user_error)?;
        let token = self.issue_for(&user)?;
        info!(user_id = %user.id(), "account created");
        Ok(SignedUpAccount { user, token })
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<LoggedIn, Error> {
        let user = self
            .find_user_by_credentials(credentials)
            .await
            .inspect_err(|failure| {
                debug!(username = %credentials.username(), reason = %failure, "login rejected");
            })?;
        let token = self.issue_for(&user)?;
        Ok(LoggedIn {
            user_id: user.id(),
            token,
        })
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::AlreadyExists { .. } => Error::invalid_request("user already exists")
            .with_details(json!({ "field": "username", "code": "conflict" })),
        UserPersistenceError::NotFound { .. } => Error::not_found("user not found"),
        UserPersistenceError::AlreadyBound { .. } => {
            Error::invalid_request("user already owns a linktree")
                .with_details(json!({ "code": "conflict" }))
        }
    }
}

fn map_hash_error(error: CredentialHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenError) -> Error {
    Error::internal(format!("failed to issue token: {error}"))
}
