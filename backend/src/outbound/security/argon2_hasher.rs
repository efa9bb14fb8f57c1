//! Argon2id implementation of [`CredentialHasher`].
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
//! so parameters can be raised later without invalidating existing records.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::domain::ports::{CredentialHashError, CredentialHasher};

const SALT_BYTES: usize = 16;

/// Error raised for unusable Argon2 cost parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid argon2 parameters: {message}")]
pub struct Argon2CredentialHasherError {
    message: String,
}

/// Argon2id password hasher with configurable cost.
#[derive(Clone)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Default for Argon2CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }
}

impl Argon2CredentialHasher {
    /// Build a hasher with explicit memory (KiB), iteration, and lane costs.
    ///
    /// # Errors
    /// Returns [`Argon2CredentialHasherError`] when the parameters are out of
    /// range.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, Argon2CredentialHasherError> {
        let params = Params::new(memory_kib, iterations, parallelism, None).map_err(|err| {
            Argon2CredentialHasherError {
                message: err.to_string(),
            }
        })?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialHashError> {
        let mut bytes = [0_u8; SALT_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let salt = SaltString::encode_b64(&bytes)
            .map_err(|err| CredentialHashError::hash(err.to_string()))?;
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| CredentialHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, CredentialHashError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|err| CredentialHashError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialHashError::malformed_hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2CredentialHasher {
        Argon2CredentialHasher::with_params(8, 1, 1).expect("cheap test params")
    }

    #[rstest]
    fn hash_produces_salted_phc_string(hasher: Argon2CredentialHasher) {
        let first = hasher.hash("password1").expect("hash");
        let second = hasher.hash("password1").expect("hash");

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second, "each hash uses a fresh salt");
        assert!(!first.contains("password1"));
    }

    #[rstest]
    fn verify_accepts_only_matching_password(hasher: Argon2CredentialHasher) {
        let stored = hasher.hash("password1").expect("hash");
        assert_eq!(hasher.verify("password1", &stored), Ok(true));
        assert_eq!(hasher.verify("password2", &stored), Ok(false));
    }

    #[rstest]
    fn verify_rejects_unparseable_hash(hasher: Argon2CredentialHasher) {
        let result = hasher.verify("password1", "plaintext");
        assert!(matches!(
            result,
            Err(CredentialHashError::MalformedHash { .. })
        ));
    }

    #[rstest]
    fn with_params_rejects_zero_iterations() {
        assert!(Argon2CredentialHasher::with_params(8, 0, 1).is_err());
    }
}
