//! Process configuration loaded through OrthoConfig.
//!
//! Values come from `LINKTREE_*` environment variables, CLI flags, and an
//! optional config file. Signing secret resolution lives here too, since it
//! depends on the build mode as well as on the loaded values.

pub mod fingerprint;

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{DEFAULT_TOKEN_TTL, SigningSecret, SigningSecretTooShort};

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Build mode used when deciding whether an ephemeral secret is acceptable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to a random secret with a warning.
    Debug,
    /// Release builds require a configured secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while turning settings into runtime values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Neither a secret nor a secret file is configured in a release build.
    #[error(
        "no signing secret configured; set LINKTREE_SECRET_KEY or LINKTREE_SECRET_KEY_FILE"
    )]
    MissingSecret,
    /// Reading the secret file failed.
    #[error("failed to read signing secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configured secret is shorter than the HMAC minimum.
    #[error(transparent)]
    SecretTooShort(#[from] SigningSecretTooShort),
    /// The token lifetime is zero.
    #[error("LINKTREE_TOKEN_TTL_SECS must be greater than zero")]
    ZeroTokenTtl,
}

/// Runtime configuration for the linktree service.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LINKTREE")]
pub struct LinktreeSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string. Unset selects the in-memory store.
    pub database_url: Option<String>,
    /// Raw HMAC signing secret.
    pub secret_key: Option<String>,
    /// Path to a file holding the signing secret.
    pub secret_key_file: Option<PathBuf>,
    /// Permit a random secret when none is configured.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
    /// Token lifetime in seconds.
    pub token_ttl_secs: Option<u64>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl fmt::Debug for LinktreeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinktreeSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| ".."))
            .field("secret_key", &self.secret_key.as_ref().map(|_| ".."))
            .field("secret_key_file", &self.secret_key_file)
            .field("allow_ephemeral_secret", &self.allow_ephemeral_secret)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}

impl LinktreeSettings {
    /// Listener address, defaulting to `0.0.0.0:8080`.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND_ADDR))
    }

    /// Database URL when persistence is configured.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Maximum pool size, defaulting to ten connections.
    #[must_use]
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Token lifetime, defaulting to one day.
    ///
    /// # Errors
    /// Returns [`SettingsError::ZeroTokenTtl`] for a zero lifetime.
    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        match self.token_ttl_secs {
            None => Ok(DEFAULT_TOKEN_TTL),
            Some(0) => Err(SettingsError::ZeroTokenTtl),
            Some(secs) => Ok(Duration::from_secs(secs)),
        }
    }

    /// Resolve the process signing secret.
    ///
    /// An inline secret wins over a secret file. Without either, debug builds
    /// and deployments that set `LINKTREE_ALLOW_EPHEMERAL_SECRET` get a random
    /// secret; tokens then stop verifying after a restart.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when the secret is missing in a release
    /// build, unreadable, or too short.
    pub fn signing_secret(&self, mode: BuildMode) -> Result<SigningSecret, SettingsError> {
        if let Some(raw) = self.secret_key.as_deref().filter(|raw| !raw.is_empty()) {
            return Ok(SigningSecret::new(raw.as_bytes().to_vec())?);
        }

        if let Some(path) = &self.secret_key_file {
            let bytes = Zeroizing::new(std::fs::read(path).map_err(|source| {
                SettingsError::SecretRead {
                    path: path.clone(),
                    source,
                }
            })?);
            return Ok(SigningSecret::new(trim_trailing_newline(&bytes).to_vec())?);
        }

        if mode == BuildMode::Debug || self.allow_ephemeral_secret {
            warn!("no signing secret configured; using an ephemeral secret (dev only)");
            return Ok(SigningSecret::generate());
        }
        Err(SettingsError::MissingSecret)
    }
}

fn trim_trailing_newline(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}
