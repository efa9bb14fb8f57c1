//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every client-side failure becomes `400` with `details.field` naming the
//! offending request field and `details.code` a stable machine code.

use serde_json::json;

use crate::domain::{
    AuthValidationError, Error, LinkId, LinktreeValidationError, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    Empty,
    TooLong,
    TooShort,
    InvalidEmail,
    InvalidUuid,
    MissingSelector,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Empty => "empty",
            ErrorCode::TooLong => "too_long",
            ErrorCode::TooShort => "too_short",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::MissingSelector => "missing_selector",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "code": code.as_str(),
        }))
    }
}

fn user_code(err: &UserValidationError) -> ErrorCode {
    match err {
        UserValidationError::EmptyUsername | UserValidationError::EmptyEmail => ErrorCode::Empty,
        UserValidationError::UsernameTooLong { .. } => ErrorCode::TooLong,
        UserValidationError::InvalidEmail => ErrorCode::InvalidEmail,
    }
}

/// Map a signup or login validation failure.
pub(crate) fn auth_validation_error(err: AuthValidationError) -> Error {
    let code = match &err {
        AuthValidationError::User(inner) => user_code(inner),
        AuthValidationError::EmptyPassword => ErrorCode::Empty,
        AuthValidationError::PasswordTooShort { .. } => ErrorCode::TooShort,
    };
    ValidationError::new(err.field(), err.to_string()).with_code(code)
}

fn linktree_field_and_code(err: &LinktreeValidationError) -> (&'static str, ErrorCode) {
    match err {
        LinktreeValidationError::EmptyLinkName => ("name", ErrorCode::Empty),
        LinktreeValidationError::LinkNameTooLong { .. } => ("name", ErrorCode::TooLong),
        LinktreeValidationError::EmptyLinkUrl => ("link", ErrorCode::Empty),
        LinktreeValidationError::LinkUrlTooLong { .. } => ("link", ErrorCode::TooLong),
        LinktreeValidationError::ProfileTextTooLong { field, .. } => (*field, ErrorCode::TooLong),
        LinktreeValidationError::MissingLinkSelector => ("id", ErrorCode::MissingSelector),
    }
}

/// Map a linktree field validation failure.
pub(crate) fn linktree_validation_error(err: LinktreeValidationError) -> Error {
    let (field, code) = linktree_field_and_code(&err);
    ValidationError::new(field, err.to_string()).with_code(code)
}

/// Map a validation failure of the `index`th element of `links`.
pub(crate) fn link_list_validation_error(err: LinktreeValidationError, index: usize) -> Error {
    let (field, code) = linktree_field_and_code(&err);
    ValidationError::new(format!("links.{field}"), err.to_string()).with_index(code, index)
}

/// Reject a malformed JSON body.
pub(crate) fn malformed_body_error(reason: impl std::fmt::Display) -> Error {
    ValidationError::new("body", format!("malformed request body: {reason}"))
        .with_code(ErrorCode::MalformedBody)
}

pub(crate) fn parse_link_id(value: &str, field: FieldName) -> Result<LinkId, Error> {
    LinkId::parse(value.trim()).map_err(|_| {
        let field = field.as_str();
        ValidationError::new(field, format!("{field} must be a valid UUID"))
            .with_code(ErrorCode::InvalidUuid)
    })
}
