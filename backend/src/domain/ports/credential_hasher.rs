//! Port for one-way password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashers.
    pub enum CredentialHashError {
        /// Hashing the password failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes new passwords and checks candidates against stored hashes.
///
/// Implementations compare in constant time and embed their own salt and
/// parameters in the returned string.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Produce a self-describing hash of `password`.
    ///
    /// # Errors
    /// Returns [`CredentialHashError::Hash`] when hashing fails.
    fn hash(&self, password: &str) -> Result<String, CredentialHashError>;

    /// Check `password` against `stored_hash`.
    ///
    /// Returns `Ok(false)` for a wrong password.
    ///
    /// # Errors
    /// Returns [`CredentialHashError::MalformedHash`] when `stored_hash` is
    /// unreadable.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, CredentialHashError>;
}
