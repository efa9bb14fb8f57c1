//! Authentication inputs: login credentials and signup registrations.
//!
//! Handlers hand raw strings to these constructors; nothing reaches a port
//! until it has been validated here. Passwords are held in [`Zeroizing`]
//! buffers so they are wiped from memory when dropped.

use zeroize::Zeroizing;

use super::{EmailAddress, UserValidationError, Username};

/// Minimum characters required for a new password.
pub const PASSWORD_MIN: usize = 8;

/// Validation failures for authentication payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    /// A user field (username or email) was invalid.
    #[error(transparent)]
    User(#[from] UserValidationError),
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password was shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Lower bound on characters.
        min: usize,
    },
}

impl AuthValidationError {
    /// Name of the request field at fault.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::User(
                UserValidationError::EmptyUsername | UserValidationError::UsernameTooLong { .. },
            ) => "username",
            Self::User(UserValidationError::EmptyEmail | UserValidationError::InvalidEmail) => {
                "email"
            }
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
        }
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` satisfies [`Username`].
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use linktree::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada", "correct horse").unwrap();
/// assert_eq!(creds.username().as_str(), "ada");
/// assert_eq!(creds.password(), "correct horse");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    ///
    /// # Errors
    /// Returns [`AuthValidationError`] for a blank username or empty password.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, AuthValidationError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Account handle to look up.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plaintext password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated signup payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw inputs.
    ///
    /// # Errors
    /// Returns [`AuthValidationError`] when any field is invalid or the
    /// password is shorter than [`PASSWORD_MIN`].
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        let username = Username::new(username)?;
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(AuthValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested handle.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password to be hashed.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
