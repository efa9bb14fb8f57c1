//! Signing secret fingerprinting for operational visibility.
//!
//! Operators compare fingerprints across replicas to confirm they share a
//! secret without the secret itself reaching the logs.

use sha2::{Digest, Sha256};

use crate::domain::SigningSecret;

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 fingerprint of the secret as 16 lowercase hex characters.
///
/// # Examples
///
/// ```rust
/// use linktree::domain::SigningSecret;
/// use linktree::settings::fingerprint::secret_fingerprint;
///
/// let fp = secret_fingerprint(&SigningSecret::generate());
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &SigningSecret) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.expose());
    let result = hasher.finalize();
    hex::encode(&result[..FINGERPRINT_BYTES])
}
