//! Signed identity claims encoded as HS256 JSON Web Tokens.
//!
//! The codec only checks integrity: signature, algorithm, and structure.
//! Expiry is judged by [`crate::domain::TokenAuthority`] against its clock.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::UserId;

/// Minimum number of secret bytes accepted for HMAC signing.
pub const SIGNING_SECRET_MIN_LEN: usize = 32;

/// Errors raised while issuing or verifying tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// No token was supplied.
    #[error("token is empty")]
    Empty,
    /// The signature does not verify against the process secret.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// The header names an algorithm other than HS256.
    #[error("token algorithm is not accepted")]
    AlgorithmMismatch,
    /// The token is not a well-formed JWT carrying the expected claims.
    #[error("token is malformed")]
    Malformed,
    /// The token is past its expiry.
    #[error("token expired")]
    Expired,
    /// Encoding failed.
    #[error("failed to sign token: {message}")]
    Signing {
        /// Library error text.
        message: String,
    },
}

/// Process-wide HMAC secret. Wiped from memory on drop.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

/// Error returned for secrets shorter than [`SIGNING_SECRET_MIN_LEN`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("signing secret too short: need >= {min_len} bytes, got {length}")]
pub struct SigningSecretTooShort {
    /// Supplied length.
    pub length: usize,
    /// Required length.
    pub min_len: usize,
}

impl SigningSecret {
    /// Wrap secret bytes, enforcing the minimum length.
    ///
    /// # Errors
    /// Returns [`SigningSecretTooShort`] for short secrets.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, SigningSecretTooShort> {
        let bytes = Zeroizing::new(bytes.into());
        if bytes.len() < SIGNING_SECRET_MIN_LEN {
            return Err(SigningSecretTooShort {
                length: bytes.len(),
                min_len: SIGNING_SECRET_MIN_LEN,
            });
        }
        Ok(Self(bytes))
    }

    /// Generate a random secret for development use.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new(vec![0_u8; 64]);
        rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, bytes.as_mut_slice());
        Self(bytes)
    }

    /// Borrow the raw bytes.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

/// Identity asserted by a token.
///
/// The password credential is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user identifier.
    pub sub: UserId,
    /// Username at issue time.
    pub username: String,
    /// Email at issue time.
    pub email: String,
    /// Unique token identifier.
    pub jti: Uuid,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// HS256 encoder/decoder bound to one secret.
#[derive(Clone)]
pub struct ClaimsCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl ClaimsCodec {
    /// Build a codec for `secret`.
    #[must_use]
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);
        Self {
            encoding: EncodingKey::from_secret(secret.expose()),
            decoding: DecodingKey::from_secret(secret.expose()),
            validation,
        }
    }

    /// Sign `claims` into a compact token.
    ///
    /// # Errors
    /// Returns [`TokenError::Signing`] if serialisation fails.
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(
            |err| TokenError::Signing {
                message: err.to_string(),
            },
        )
    }

    /// Verify integrity and parse the claims of `token`.
    ///
    /// # Errors
    /// Returns [`TokenError`] for empty, forged, foreign-algorithm, or
    /// malformed tokens. Expired tokens decode successfully.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Empty);
        }
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::AlgorithmMismatch
                }
                _ => TokenError::Malformed,
            })
    }
}
