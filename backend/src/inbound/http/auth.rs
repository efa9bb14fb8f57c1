//! Token gate for protected routes.
//!
//! [`RequireToken`] reads the `token` request header, verifies it with the
//! [`TokenAuthority`], and either short-circuits with `401` or stores an
//! [`AuthenticatedUser`] in the request extensions for handlers to extract.
//! The gate never touches the user store.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{FromRequest, HttpMessage, HttpRequest, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{Claims, Error, TokenAuthority, TokenError, UserId};

/// Request header carrying the bearer token.
pub const TOKEN_HEADER: &str = "token";
/// Message returned when the token header is absent or blank.
pub const MISSING_TOKEN_MESSAGE: &str = "No Authorization header provided";
/// Message returned when the token fails verification.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";
/// Message returned when the token is past its expiry.
pub const EXPIRED_TOKEN_MESSAGE: &str = "token expired";

/// Identity proven by the request's token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject of the verified token.
    pub user_id: UserId,
    /// Username claim.
    pub username: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| Error::unauthorized(MISSING_TOKEN_MESSAGE)),
        )
    }
}

/// Check a raw header value and return the proven identity.
///
/// # Errors
/// Returns an `unauthorized` [`Error`] naming the reason for rejection.
pub fn authenticate(
    tokens: &TokenAuthority,
    header: Option<&str>,
) -> Result<AuthenticatedUser, Error> {
    let raw = header.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(Error::unauthorized(MISSING_TOKEN_MESSAGE));
    }
    tokens
        .verify(raw)
        .map(AuthenticatedUser::from)
        .map_err(|err| match err {
            TokenError::Empty => Error::unauthorized(MISSING_TOKEN_MESSAGE),
            TokenError::Expired => Error::unauthorized(EXPIRED_TOKEN_MESSAGE),
            _ => Error::unauthorized(INVALID_TOKEN_MESSAGE),
        })
}

/// Middleware factory guarding a scope with token verification.
///
/// ```ignore
/// let protected = web::scope("").wrap(RequireToken::new(tokens)).service(get_linktree);
/// ```
#[derive(Clone)]
pub struct RequireToken {
    tokens: Rc<TokenAuthority>,
}

impl RequireToken {
    /// Guard with the given authority.
    #[must_use]
    pub fn new(tokens: TokenAuthority) -> Self {
        Self {
            tokens: Rc::new(tokens),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireToken
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireTokenMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireTokenMiddleware {
            service,
            tokens: Rc::clone(&self.tokens),
        }))
    }
}

/// Service wrapper produced by [`RequireToken`].
pub struct RequireTokenMiddleware<S> {
    service: S,
    tokens: Rc<TokenAuthority>,
}

impl<S, B> Service<ServiceRequest> for RequireTokenMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header = req
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        match authenticate(&self.tokens, header) {
            Ok(user) => {
                debug!(user_id = %user.user_id, username = %user.username, "token accepted");
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                let response = req.into_response(err.error_response()).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::domain::{EmailAddress, SigningSecret, TokenSubject, Username};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse, web};
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};
    use serde_json::Value;

    #[fixture]
    fn tokens() -> TokenAuthority {
        let secret = SigningSecret::new(vec![7_u8; 32]).expect("secret");
        TokenAuthority::new(&secret, Arc::new(DefaultClock))
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            user_id: UserId::random(),
            username: Username::new("ada").expect("username"),
            email: EmailAddress::new("ada@example.com").expect("email"),
        }
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(format!("{}:{}", user.user_id, user.username))
    }

    async fn call(tokens: TokenAuthority, header: Option<&str>) -> (StatusCode, Vec<u8>) {
        let app = actix_test::init_service(
            App::new().service(
                web::scope("")
                    .wrap(RequireToken::new(tokens))
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;
        let mut request = actix_test::TestRequest::get().uri("/me");
        if let Some(value) = header {
            request = request.insert_header((TOKEN_HEADER, value));
        }
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        (status, actix_test::read_body(response).await.to_vec())
    }

    fn error_text(body: &[u8]) -> String {
        let value: Value = serde_json::from_slice(body).expect("json");
        value["error"].as_str().expect("error key").to_owned()
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    #[actix_web::test]
    async fn missing_token_is_rejected(tokens: TokenAuthority, #[case] header: Option<&str>) {
        let (status, body) = call(tokens, header).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_text(&body), MISSING_TOKEN_MESSAGE);
    }

    #[rstest]
    #[actix_web::test]
    async fn garbage_token_is_rejected(tokens: TokenAuthority) {
        let (status, body) = call(tokens, Some("testtoken")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_text(&body), INVALID_TOKEN_MESSAGE);
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_token_reaches_handler(tokens: TokenAuthority) {
        let subject = subject();
        let issued = tokens.issue_default(&subject).expect("issue");
        let (status, body) = call(tokens, Some(&issued.token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("{}:ada", subject.user_id).into_bytes());
    }

    #[rstest]
    fn expired_token_reports_expiry(tokens: TokenAuthority) {
        let issued = tokens
            .issue(&subject(), Duration::from_secs(0))
            .expect("issue");
        let err = authenticate(&tokens, Some(&issued.token)).expect_err("expired");
        assert_eq!(err.message(), EXPIRED_TOKEN_MESSAGE);
    }

    #[rstest]
    fn token_from_another_secret_is_invalid(tokens: TokenAuthority) {
        let other_secret = SigningSecret::new(vec![9_u8; 32]).expect("secret");
        let other = TokenAuthority::new(&other_secret, Arc::new(DefaultClock));
        let issued = other.issue_default(&subject()).expect("issue");
        let err = authenticate(&tokens, Some(&issued.token)).expect_err("foreign");
        assert_eq!(err.message(), INVALID_TOKEN_MESSAGE);
    }
}
