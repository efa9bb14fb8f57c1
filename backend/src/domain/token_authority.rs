//! Issues and verifies identity tokens.
//!
//! The authority owns the signing secret and a clock. Verification trusts
//! the signed payload and never consults the user store.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tracing::debug;
use uuid::Uuid;

use super::claims::{Claims, ClaimsCodec, SigningSecret, TokenError};
use super::{EmailAddress, UserId, Username};

/// Token lifetime used when none is configured.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Identity a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    /// User identifier placed in `sub`.
    pub user_id: UserId,
    /// Username claim.
    pub username: Username,
    /// Email claim.
    pub email: EmailAddress,
}

/// Freshly signed token with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact JWT.
    pub token: String,
    /// Claims embedded in `token`.
    pub claims: Claims,
}

/// Signs tokens at signup/login and checks them on protected requests.
#[derive(Clone)]
pub struct TokenAuthority {
    codec: ClaimsCodec,
    clock: Arc<dyn Clock + Send + Sync>,
    ttl: Duration,
}

impl TokenAuthority {
    /// Build an authority for `secret` using `clock` for timestamps.
    #[must_use]
    pub fn new(secret: &SigningSecret, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            codec: ClaimsCodec::new(secret),
            clock,
            ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Override the default lifetime used by [`Self::issue_default`].
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Lifetime applied by [`Self::issue_default`].
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token valid for `ttl` from now.
    ///
    /// # Errors
    /// Returns [`TokenError::Signing`] if the claims cannot be encoded.
    pub fn issue(&self, subject: &TokenSubject, ttl: Duration) -> Result<IssuedToken, TokenError> {
        let iat = self.clock.utc().timestamp();
        let lifetime = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: subject.user_id,
            username: subject.username.as_str().to_owned(),
            email: subject.email.as_str().to_owned(),
            jti: Uuid::new_v4(),
            iat,
            exp: iat.saturating_add(lifetime),
        };
        let token = self.codec.encode(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// Issue a token with the configured lifetime.
    ///
    /// # Errors
    /// Returns [`TokenError::Signing`] if the claims cannot be encoded.
    pub fn issue_default(&self, subject: &TokenSubject) -> Result<IssuedToken, TokenError> {
        self.issue(subject, self.ttl)
    }

    /// Verify `token` and return its claims.
    ///
    /// # Errors
    /// Returns [`TokenError`] when the token is empty, forged, signed with
    /// another algorithm, malformed, or expired.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.codec.decode(token).inspect_err(|err| {
            debug!(error = %err, "token rejected");
        })?;
        if claims.exp <= self.clock.utc().timestamp() {
            debug!(jti = %claims.jti, exp = claims.exp, "token expired");
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
