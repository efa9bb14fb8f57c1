//! Transport-agnostic failure type shared by services and adapters.
//!
//! `inbound::http::error` owns the mapping onto status codes and bodies.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::TraceId;

const FALLBACK_MESSAGE: &str = "unspecified error";

/// Failure category. Serialised in `snake_case` and mapped one-to-one onto an
/// HTTP status by the inbound adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Bad input or a broken business rule (`400`).
    InvalidRequest,
    /// Missing, malformed or expired credentials (`401`).
    Unauthorized,
    /// Caller does not own the target resource (`403`).
    Forbidden,
    /// Target resource is absent (`404`).
    NotFound,
    /// Clashes with existing state, e.g. a taken username (`409`).
    Conflict,
    /// The store could not be reached (`503`).
    ServiceUnavailable,
    /// Anything unexpected (`500`).
    InternalError,
}

/// Returned by [`Error::try_new`] when the message is whitespace only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("error message must not be blank")]
pub struct BlankMessage;

/// A categorised failure with an optional correlation id and JSON details.
///
/// Construction reads [`TraceId::current`], so an error raised while serving
/// a request already knows which request it belongs to.
///
/// ```
/// use linktree::domain::{Error, ErrorCode};
///
/// let err = Error::conflict("username already taken");
/// assert_eq!(err.code(), ErrorCode::Conflict);
/// assert_eq!(err.to_string(), "username already taken");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "WireError", into = "WireError")]
pub struct Error {
    #[schema(example = "not_found")]
    code: ErrorCode,
    #[schema(example = "link not found in linktree")]
    message: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<Value>,
}

macro_rules! shorthand {
    ($($name:ident => $code:ident),+ $(,)?) => {
        $(
            #[doc = concat!("Shorthand for [`ErrorCode::", stringify!($code), "`].")]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )+
    };
}

impl Error {
    /// Build an error; a blank message is swapped for a generic one.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message)
            .unwrap_or_else(|BlankMessage| Self::assemble(code, FALLBACK_MESSAGE.to_owned()))
    }

    /// Build an error, refusing blank messages.
    ///
    /// # Errors
    /// [`BlankMessage`] when `message` trims to nothing.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, BlankMessage> {
        let message = message.into();
        if message.trim().is_empty() {
            Err(BlankMessage)
        } else {
            Ok(Self::assemble(code, message))
        }
    }

    fn assemble(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    shorthand! {
        invalid_request => InvalidRequest,
        unauthorized => Unauthorized,
        forbidden => Forbidden,
        not_found => NotFound,
        conflict => Conflict,
        service_unavailable => ServiceUnavailable,
        internal => InternalError,
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Correlation id, if one was in scope or attached later.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Machine-readable extras such as the offending field.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Overwrite the correlation id.
    #[must_use]
    pub fn with_trace_id(self, id: impl Into<String>) -> Self {
        Self {
            trace_id: Some(id.into()),
            ..self
        }
    }

    /// Attach JSON details.
    ///
    /// ```
    /// use linktree::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("url is required").with_details(json!({ "field": "url" }));
    /// assert_eq!(err.details().and_then(|d| d["field"].as_str()), Some("url"));
    /// ```
    #[must_use]
    pub fn with_details(self, details: Value) -> Self {
        Self {
            details: Some(details),
            ..self
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

/// Serialised shape; absent optionals are omitted.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireError {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for WireError {
    fn from(error: Error) -> Self {
        let Error {
            code,
            message,
            trace_id,
            details,
        } = error;
        Self {
            code,
            message,
            trace_id,
            details,
        }
    }
}

impl TryFrom<WireError> for Error {
    type Error = BlankMessage;

    fn try_from(wire: WireError) -> Result<Self, Self::Error> {
        let error = Error::try_new(wire.code, wire.message)?;
        Ok(Self {
            trace_id: wire.trace_id,
            details: wire.details,
            ..error
        })
    }
}
