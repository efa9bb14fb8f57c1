//! Signup and login handlers.
//!
//! ```text
//! POST /linktree/signup {"username":"ada","email":"ada@example.com","password":"correct horse"}
//! POST /linktree/login  {"username":"ada","password":"correct horse"}
//! ```
//!
//! Both routes sit outside the token gate. The issued token travels in the
//! `token` response header; signup also echoes it in the body.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{Error, LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::TOKEN_HEADER;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::auth_validation_error;

/// Signup request body.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "correct horse")]
    pub password: String,
}

/// Login request body.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "correct horse")]
    pub password: String,
}

/// The created account together with its first token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    #[serde(flatten)]
    pub user: User,
    /// Token to send in the `token` header of later requests.
    pub token: String,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/linktree/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse,
            headers(("token" = String, description = "Identity token"))),
        (status = 400, description = "Invalid request or username taken", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "signup",
    security([])
)]
#[post("/linktree/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let SignupRequest {
        username,
        email,
        password,
    } = payload.into_inner();
    let password = Zeroizing::new(password);
    let registration = Registration::try_from_parts(&username, &email, &password)
        .map_err(auth_validation_error)?;

    let account = state.accounts.signup(&registration).await?;
    let token = account.token.token;
    Ok(HttpResponse::Created()
        .insert_header((TOKEN_HEADER, token.clone()))
        .json(SignupResponse {
            user: account.user,
            token,
        }))
}

/// Check credentials and issue a fresh token.
///
/// The body is the bare user id as a JSON string.
#[utoipa::path(
    post,
    path = "/linktree/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = String,
            headers(("token" = String, description = "Identity token"))),
        (status = 400, description = "Invalid request or credentials", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/linktree/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let password = Zeroizing::new(password);
    let credentials =
        LoginCredentials::try_from_parts(&username, &password).map_err(auth_validation_error)?;

    let logged_in = state.accounts.login(&credentials).await?;
    Ok(HttpResponse::Ok()
        .insert_header((TOKEN_HEADER, logged_in.token.token))
        .json(logged_in.user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{LoggedIn, SignedUpAccount};
    use crate::domain::{EmailAddress, LOGIN_FAILED_MESSAGE, TokenSubject, UserId, Username};
    use crate::inbound::http::test_utils::{MockPorts, test_tokens};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn subject(id: UserId) -> TokenSubject {
        TokenSubject {
            user_id: id,
            username: Username::new("ada").expect("username"),
            email: EmailAddress::new("ada@example.com").expect("email"),
        }
    }

    async fn post(ports: MockPorts, uri: &str, body: Value) -> (StatusCode, Option<String>, Value) {
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state(test_tokens()))
                .service(signup)
                .service(login),
        )
        .await;
        let request = test::TestRequest::post()
            .uri(uri)
            .set_json(body)
            .to_request();
        let response = test::call_service(&app, request).await;
        let status = response.status();
        let token = response
            .headers()
            .get(TOKEN_HEADER)
            .map(|value| value.to_str().expect("ascii").to_owned());
        let body = test::read_body_json(response).await;
        (status, token, body)
    }

    #[actix_web::test]
    async fn signup_returns_created_user_and_token() {
        let id = UserId::random();
        let mut ports = MockPorts::default();
        ports.accounts.expect_signup().times(1).returning(move |reg| {
            let user = crate::domain::User::new(id, reg.username().clone(), reg.email().clone());
            let token = test_tokens().issue_default(&subject(id)).expect("issue");
            Ok(SignedUpAccount { user, token })
        });

        let (status, token, body) = post(
            ports,
            "/linktree/signup",
            json!({"username": "ada", "email": "ada@example.com", "password": "correct horse"}),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["username"], "ada");
        assert_eq!(body["id"], id.to_string());
        assert_eq!(token.as_deref(), body["token"].as_str());
        assert!(body.get("password").is_none());
    }

    #[rstest]
    #[case(json!({"username": "", "email": "a@b", "password": "correct horse"}), "username")]
    #[case(json!({"username": "ada", "email": "nope", "password": "correct horse"}), "email")]
    #[case(json!({"username": "ada", "email": "a@b", "password": "short"}), "password")]
    #[actix_web::test]
    async fn signup_validation_never_reaches_port(#[case] body: Value, #[case] field: &str) {
        let mut ports = MockPorts::default();
        ports.accounts.expect_signup().never();

        let (status, _, body) = post(ports, "/linktree/signup", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn login_returns_bare_id_and_token_header() {
        let id = UserId::random();
        let mut ports = MockPorts::default();
        ports.accounts.expect_login().returning(move |_| {
            Ok(LoggedIn {
                user_id: id,
                token: test_tokens().issue_default(&subject(id)).expect("issue"),
            })
        });

        let (status, token, body) = post(
            ports,
            "/linktree/login",
            json!({"username": "ada", "password": "correct horse"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(id.to_string()));
        let claims = test_tokens().verify(&token.expect("token header")).expect("valid");
        assert_eq!(claims.sub, id);
    }

    #[actix_web::test]
    async fn login_failure_is_bad_request() {
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_login()
            .returning(|_| Err(Error::invalid_request(LOGIN_FAILED_MESSAGE)));

        let (status, token, body) = post(
            ports,
            "/linktree/login",
            json!({"username": "ada", "password": "wrong password"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(token.is_none());
        assert_eq!(body["message"], LOGIN_FAILED_MESSAGE);
    }
}
