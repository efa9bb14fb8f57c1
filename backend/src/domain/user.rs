//! User data model.
//!
//! A user owns at most one linktree. The password credential never appears on
//! [`User`]; it lives only inside the persistence adapters as a PHC string.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identifiers::uuid_identifier;
use super::LinktreeId;

uuid_identifier!(
    /// Stable user identifier.
    UserId,
    "user id"
);

/// Maximum number of characters accepted for a username.
pub const USERNAME_MAX: usize = 64;

/// Validation errors returned by the user field constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username exceeded [`USERNAME_MAX`] characters.
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Upper bound on characters.
        max: usize,
    },
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not contain an `@` separator with text on both sides.
    #[error("email must be a valid address")]
    InvalidEmail,
}

/// Case-sensitive login handle, unique across users.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace.
/// - Between 1 and [`USERNAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ada")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when the value is blank or too long.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Contact address supplied at signup.
///
/// Only the shape `local@domain` is checked; deliverability is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ada@example.com")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when the value is blank or lacks an `@`.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }

    /// Borrow the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Registered account.
///
/// # Examples
/// ```
/// use linktree::domain::{EmailAddress, User, UserId, Username};
///
/// let user = User::new(
///     UserId::random(),
///     Username::new("ada").unwrap(),
///     EmailAddress::new("ada@example.com").unwrap(),
/// );
/// assert!(user.linktree_id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    linktree_id: Option<LinktreeId>,
}

impl User {
    /// Build a user that does not own a linktree yet.
    #[must_use]
    pub fn new(id: UserId, username: Username, email: EmailAddress) -> Self {
        Self {
            id,
            username,
            email,
            linktree_id: None,
        }
    }

    /// Attach the owned linktree reference.
    #[must_use]
    pub fn with_linktree(mut self, linktree_id: LinktreeId) -> Self {
        self.linktree_id = Some(linktree_id);
        self
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login handle.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The linktree this user owns, if one has been bound.
    #[must_use]
    pub fn linktree_id(&self) -> Option<LinktreeId> {
        self.linktree_id
    }

    /// Whether `linktree_id` is the tree bound to this user.
    #[must_use]
    pub fn owns(&self, linktree_id: LinktreeId) -> bool {
        self.linktree_id == Some(linktree_id)
    }
}
