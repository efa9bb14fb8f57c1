//! Rendering of domain [`Error`]s as HTTP responses.
//!
//! `401` bodies put the reason under `error`; every other status serialises
//! the domain error itself, with `500` text and details withheld.

use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError, http::StatusCode};
use serde::Serialize;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Handler result whose error side renders through [`ResponseError`].
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthFailure<'a> {
    code: ErrorCode,
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<&'a str>,
}

/// Replacement body for `500`s: keeps only the correlation id.
fn scrubbed(error: &Error) -> Error {
    let bare = Error::internal(INTERNAL_MESSAGE);
    match error.trace_id() {
        Some(id) => bare.with_trace_id(id),
        None => bare,
    }
}

fn with_trace_header(mut builder: HttpResponseBuilder, error: &Error) -> HttpResponseBuilder {
    if let Some(id) = error.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }
    builder
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = with_trace_header(HttpResponse::build(self.status_code()), self);
        match self.code() {
            ErrorCode::Unauthorized => builder.json(AuthFailure {
                code: self.code(),
                error: self.message(),
                trace_id: self.trace_id(),
            }),
            ErrorCode::InternalError => builder.json(scrubbed(self)),
            _ => builder.json(self),
        }
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "unhandled actix error");
        Error::internal(INTERNAL_MESSAGE)
    }
}
