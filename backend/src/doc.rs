//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the request and response
//! schemas, and the `token` header security scheme. The document backs
//! Swagger UI in debug builds and is exported by `openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Link, LinkId, Linktree, LinktreeId, User, UserId};
use crate::inbound::http::accounts::{LoginRequest, SignupRequest, SignupResponse};
use crate::inbound::http::linktrees::{
    CreateLinktreeRequest, DeleteLinkRequest, LinkRequest, UpdateLinkRequest,
};

/// Name of the security scheme applied to gated operations.
pub const TOKEN_SECURITY_SCHEME: &str = "TokenHeader";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            TOKEN_SECURITY_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "token",
                "Identity token returned by signup and login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Linktree API",
        description = "Accounts, token-gated linktree documents, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("TokenHeader" = [])),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::linktrees::create_linktree,
        crate::inbound::http::linktrees::get_linktree,
        crate::inbound::http::linktrees::list_linktrees,
        crate::inbound::http::linktrees::add_link,
        crate::inbound::http::linktrees::update_link,
        crate::inbound::http::linktrees::delete_link,
        crate::inbound::http::linktrees::set_bio,
        crate::inbound::http::linktrees::set_fullname,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        UserId,
        Linktree,
        LinktreeId,
        Link,
        LinkId,
        SignupRequest,
        SignupResponse,
        LoginRequest,
        CreateLinktreeRequest,
        LinkRequest,
        UpdateLinkRequest,
        DeleteLinkRequest,
    )),
    tags(
        (name = "accounts", description = "Signup and login"),
        (name = "linktrees", description = "Linktree documents and their links"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("Linktree", "links")]
    #[case("Link", "visits")]
    #[case("User", "username")]
    fn schemas_expose_wire_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert_object_schema_has_field(schemas.get(schema).expect("schema"), field);
    }

    #[rstest]
    #[case("/linktree/signup")]
    #[case("/linktree/login")]
    #[case("/linktree")]
    #[case("/linktrees")]
    #[case("/linktree/{id}")]
    #[case("/linktree/{id}/addlink")]
    #[case("/linktree/{id}/updatelink")]
    #[case("/linktree/{id}/deletelink")]
    #[case("/linktree/{id}/addbio")]
    #[case("/linktree/{id}/addfullname")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        assert!(ApiDoc::openapi().paths.paths.contains_key(path), "{path}");
    }

    #[rstest]
    fn token_header_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(TOKEN_SECURITY_SCHEME));
    }
}
