//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities for accounts and linktrees, the
//! token authority that proves identity, and the services that implement the
//! driving ports. Nothing in here knows about HTTP or SQL.
//!
//! Public surface:
//! - `Error` / `ErrorCode` — transport-agnostic failure payload.
//! - `User`, `Username`, `EmailAddress` — account identity.
//! - `Linktree`, `Link`, `LinkDraft`, `LinkFields`, `LinkMatch` — the profile
//!   document and the inputs to its atomic primitives.
//! - `TokenAuthority`, `ClaimsCodec` — signed identity tokens.
//! - `AccountService`, `LinktreeService` — use-case implementations.

pub mod account_service;
pub mod auth;
pub mod claims;
pub mod error;
mod identifiers;
pub mod linktree;
pub mod linktree_service;
pub mod ports;
pub mod token_authority;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, LOGIN_FAILED_MESSAGE, LoginFailure};
pub use self::auth::{AuthValidationError, LoginCredentials, PASSWORD_MIN, Registration};
pub use self::claims::{
    Claims, ClaimsCodec, SIGNING_SECRET_MIN_LEN, SigningSecret, SigningSecretTooShort, TokenError,
};
pub use self::error::{BlankMessage, Error, ErrorCode};
pub use self::identifiers::InvalidIdentifier;
pub use self::linktree::{
    Link, LinkDraft, LinkFields, LinkId, LinkMatch, Linktree, LinktreeId,
    LinktreeValidationError, ProfileText,
};
pub use self::linktree_service::LinktreeService;
pub use self::token_authority::{DEFAULT_TOKEN_TTL, IssuedToken, TokenAuthority, TokenSubject};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, User, UserId, UserValidationError, Username};
