//! Linktree handlers.
//!
//! ```text
//! POST   /linktree                      {"fullname":"Ada","bio":"","links":[]}
//! GET    /linktree/{id}
//! GET    /linktrees
//! POST   /linktree/{id}/addlink         {"name":"GitHub","link":"https://github.com/ada","visits":0}
//! POST   /linktree/{id}/updatelink      {"id":"…","name":"GitHub","link":"https://…","visits":3}
//! DELETE /linktree/{id}/deletelink      {"id":"…"}
//! POST   /linktree/{id}/addbio          "Analytical engines"
//! POST   /linktree/{id}/addfullname     "Ada Lovelace"
//! ```
//!
//! Every route here runs behind the token gate. Mutations return the tree as
//! it stands after the change.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::NewLinktree;
use crate::domain::{
    Error, LinkDraft, LinkFields, LinkMatch, Linktree, LinktreeId, LinktreeValidationError,
    ProfileText,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, link_list_validation_error, linktree_validation_error, parse_link_id,
};

/// Link attributes supplied by clients.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LinkRequest {
    #[schema(example = "GitHub")]
    pub name: String,
    #[schema(example = "https://github.com/ada")]
    pub link: String,
    #[serde(default)]
    pub visits: u64,
}

/// Body for `POST /linktree`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateLinktreeRequest {
    #[serde(default)]
    #[schema(example = "Ada Lovelace")]
    pub fullname: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub links: Vec<LinkRequest>,
}

/// Body for `POST /linktree/{id}/updatelink`.
///
/// The link is selected by `id` when present, otherwise by exact `name`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateLinkRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub link: String,
    #[serde(default)]
    pub visits: u64,
}

/// Body for `DELETE /linktree/{id}/deletelink`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteLinkRequest {
    pub id: String,
}

/// A malformed id cannot name any tree.
fn parse_tree_id(raw: &str) -> Result<LinktreeId, Error> {
    LinktreeId::parse(raw.trim()).map_err(|_| Error::not_found("linktree not found"))
}

fn draft_from(request: &LinkRequest) -> Result<LinkDraft, LinktreeValidationError> {
    LinkDraft::new(&request.name, &request.link, request.visits)
}

fn new_linktree(request: CreateLinktreeRequest) -> Result<NewLinktree, Error> {
    let fullname =
        ProfileText::new("fullname", request.fullname).map_err(linktree_validation_error)?;
    let bio = ProfileText::new("bio", request.bio).map_err(linktree_validation_error)?;
    let links = request
        .links
        .iter()
        .enumerate()
        .map(|(index, link)| {
            draft_from(link).map_err(|err| link_list_validation_error(err, index))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NewLinktree {
        fullname,
        bio,
        links,
    })
}

/// Create the caller's linktree and bind it to their account.
#[utoipa::path(
    post,
    path = "/linktree",
    request_body = CreateLinktreeRequest,
    responses(
        (status = 201, description = "Linktree created", body = Linktree),
        (status = 400, description = "Invalid request or caller already owns a tree", body = Error),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Caller no longer exists", body = Error)
    ),
    tags = ["linktrees"],
    operation_id = "createLinktree"
)]
#[post("/linktree")]
pub async fn create_linktree(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateLinktreeRequest>,
) -> ApiResult<HttpResponse> {
    let tree = new_linktree(payload.into_inner())?;
    let created = state.linktrees.create_linktree(&user.user_id, tree).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Fetch one linktree.
#[utoipa::path(
    get,
    path = "/linktree/{id}",
    params(("id" = String, Path, description = "Linktree identifier")),
    responses(
        (status = 200, description = "Linktree", body = Linktree),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["linktrees"],
    operation_id = "getLinktree"
)]
#[get("/linktree/{id}")]
pub async fn get_linktree(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Linktree>> {
    let id = parse_tree_id(&path)?;
    state.linktrees_query.get_linktree(&id).await.map(web::Json)
}

/// List every linktree.
#[utoipa::path(
    get,
    path = "/linktrees",
    responses(
        (status = 200, description = "Linktrees", body = [Linktree]),
        (status = 401, description = "Missing or invalid token")
    ),
    tags = ["linktrees"],
    operation_id = "listLinktrees"
)]
#[get("/linktrees")]
pub async fn list_linktrees(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<Linktree>>> {
    state.linktrees_query.list_linktrees().await.map(web::Json)
}

/// Append a link.
#[utoipa::path(
    post,
    path = "/linktree/{id}/addlink",
    params(("id" = String, Path, description = "Linktree identifier")),
    request_body = LinkRequest,
    responses(
        (status = 201, description = "Link added", body = Linktree),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Tree belongs to another user", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["linktrees"],
    operation_id = "addLink"
)]
#[post("/linktree/{id}/addlink")]
pub async fn add_link(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<LinkRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_tree_id(&path)?;
    let draft = draft_from(&payload).map_err(linktree_validation_error)?;
    let tree = state.linktrees.add_link(&user.user_id, &id, draft).await?;
    Ok(HttpResponse::Created().json(tree))
}

/// Overwrite the first matching link.
#[utoipa::path(
    post,
    path = "/linktree/{id}/updatelink",
    params(("id" = String, Path, description = "Linktree identifier")),
    request_body = UpdateLinkRequest,
    responses(
        (status = 200, description = "Link updated", body = Linktree),
        (status = 400, description = "Invalid request or link not found", body = Error),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Tree belongs to another user", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["linktrees"],
    operation_id = "updateLink"
)]
#[post("/linktree/{id}/updatelink")]
pub async fn update_link(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateLinkRequest>,
) -> ApiResult<web::Json<Linktree>> {
    let id = parse_tree_id(&path)?;
    let UpdateLinkRequest {
        id: link_id,
        name,
        link,
        visits,
    } = payload.into_inner();
    let link_id = link_id
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_link_id(raw, FieldName::new("id")))
        .transpose()?;
    let selector =
        LinkMatch::from_parts(link_id, Some(name.as_str())).map_err(linktree_validation_error)?;
    let fields = LinkFields::new(&name, &link, visits).map_err(linktree_validation_error)?;
    state
        .linktrees
        .update_link(&user.user_id, &id, selector, fields)
        .await
        .map(web::Json)
}

/// Remove a link by identifier.
#[utoipa::path(
    delete,
    path = "/linktree/{id}/deletelink",
    params(("id" = String, Path, description = "Linktree identifier")),
    request_body = DeleteLinkRequest,
    responses(
        (status = 200, description = "Link removed", body = Linktree),
        (status = 400, description = "Invalid request or link not found", body = Error),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Tree belongs to another user", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["linktrees"],
    operation_id = "deleteLink"
)]
#[delete("/linktree/{id}/deletelink")]
pub async fn delete_link(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<DeleteLinkRequest>,
) -> ApiResult<web::Json<Linktree>> {
    let id = parse_tree_id(&path)?;
    let link_id = parse_link_id(&payload.id, FieldName::new("id"))?;
    state
        .linktrees
        .delete_link(&user.user_id, &id, &link_id)
        .await
        .map(web::Json)
}

/// Replace the biography. The body is a bare JSON string.
#[utoipa::path(
    post,
    path = "/linktree/{id}/addbio",
    params(("id" = String, Path, description = "Linktree identifier")),
    request_body = String,
    responses(
        (status = 200, description = "Bio replaced", body = Linktree),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Tree belongs to another user", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["linktrees"],
    operation_id = "setBio"
)]
#[post("/linktree/{id}/addbio")]
pub async fn set_bio(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<String>,
) -> ApiResult<web::Json<Linktree>> {
    let id = parse_tree_id(&path)?;
    let bio = ProfileText::new("bio", payload.into_inner()).map_err(linktree_validation_error)?;
    state
        .linktrees
        .set_bio(&user.user_id, &id, bio)
        .await
        .map(web::Json)
}

/// Replace the full name. The body is a bare JSON string.
#[utoipa::path(
    post,
    path = "/linktree/{id}/addfullname",
    params(("id" = String, Path, description = "Linktree identifier")),
    request_body = String,
    responses(
        (status = 200, description = "Full name replaced", body = Linktree),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Tree belongs to another user", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["linktrees"],
    operation_id = "setFullname"
)]
#[post("/linktree/{id}/addfullname")]
pub async fn set_fullname(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<String>,
) -> ApiResult<web::Json<Linktree>> {
    let id = parse_tree_id(&path)?;
    let fullname =
        ProfileText::new("fullname", payload.into_inner()).map_err(linktree_validation_error)?;
    state
        .linktrees
        .set_fullname(&user.user_id, &id, fullname)
        .await
        .map(web::Json)
}

#[cfg(test)]
#[path = "linktrees_tests.rs"]
mod tests;
