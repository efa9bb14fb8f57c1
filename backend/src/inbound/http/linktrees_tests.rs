//! Tests for linktree handlers behind the token gate.

use super::*;
use crate::domain::{ErrorCode, Link, LinkId, UserId};
use crate::inbound::http::configure;
use crate::inbound::http::test_utils::{MockPorts, test_tokens, token_for};
use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

fn tree(id: LinktreeId, links: Vec<Link>) -> Linktree {
    Linktree::new(id, "Ada".to_owned(), "bio".to_owned(), links)
}

fn link(name: &str) -> Link {
    Link::from_draft(LinkDraft::new(name, format!("https://{name}"), 0).expect("draft"))
}

async fn send(
    ports: MockPorts,
    request: test::TestRequest,
    caller: Option<UserId>,
) -> (StatusCode, Value) {
    let tokens = test_tokens();
    let token = caller.map(|id| token_for(&tokens, id));
    let state = ports.into_state(tokens);
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &state))).await;
    let request = match token {
        Some(token) => request.insert_header(("token", token)),
        None => request,
    };
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[actix_web::test]
async fn create_passes_caller_identity_and_returns_created() {
    let caller = UserId::random();
    let mut ports = MockPorts::default();
    ports
        .linktrees
        .expect_create_linktree()
        .withf(move |actor, tree| {
            *actor == caller && tree.links.len() == 1 && tree.bio.as_str() == "b"
        })
        .times(1)
        .returning(|_, new| {
            Ok(Linktree::create(&new.fullname, &new.bio, new.links))
        });

    let (status, body) = send(
        ports,
        test::TestRequest::post().uri("/linktree").set_json(json!({
            "fullname": "f",
            "bio": "b",
            "links": [{"name": "G", "link": "https://g"}]
        })),
        Some(caller),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["links"][0]["name"], "G");
    assert_eq!(body["links"][0]["visits"], 0);
}

#[actix_web::test]
async fn create_rejects_invalid_link_with_index() {
    let mut ports = MockPorts::default();
    ports.linktrees.expect_create_linktree().never();

    let (status, body) = send(
        ports,
        test::TestRequest::post().uri("/linktree").set_json(json!({
            "links": [{"name": "ok", "link": "https://ok"}, {"name": " ", "link": "https://x"}]
        })),
        Some(UserId::random()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["index"], 1);
    assert_eq!(body["details"]["field"], "links.name");
}

#[rstest]
#[case(test::TestRequest::get().uri("/linktrees"))]
#[case(test::TestRequest::post().uri("/linktree").set_json(json!({})))]
#[case(test::TestRequest::post().uri("/linktree/x/addbio").set_json(json!("b")))]
#[actix_web::test]
async fn protected_routes_require_token(#[case] request: test::TestRequest) {
    let mut ports = MockPorts::default();
    ports.linktrees.expect_create_linktree().never();
    ports.linktrees.expect_set_bio().never();
    ports.linktrees_query.expect_list_linktrees().never();

    let (status, body) = send(ports, request, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No Authorization header provided");
}

#[actix_web::test]
async fn malformed_tree_id_is_not_found() {
    let mut ports = MockPorts::default();
    ports.linktrees_query.expect_get_linktree().never();

    let (status, body) = send(
        ports,
        test::TestRequest::get().uri("/linktree/not-a-uuid"),
        Some(UserId::random()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "linktree not found");
}

#[actix_web::test]
async fn add_link_returns_created_tree() {
    let tree_id = LinktreeId::random();
    let mut ports = MockPorts::default();
    ports
        .linktrees
        .expect_add_link()
        .withf(move |_, id, draft| *id == tree_id && draft.name() == "GitHub")
        .returning(move |_, _, draft| Ok(tree(tree_id, vec![Link::from_draft(draft)])));

    let (status, body) = send(
        ports,
        test::TestRequest::post()
            .uri(&format!("/linktree/{tree_id}/addlink"))
            .set_json(json!({"name": "GitHub", "link": "https://github.com", "visits": 2})),
        Some(UserId::random()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["links"][0]["link"], "https://github.com");
    assert_eq!(body["links"][0]["visits"], 2);
}

#[rstest]
#[case(json!({"id": null, "name": "G", "link": "https://new"}), false)]
#[case(json!({"name": "G", "link": "https://new"}), false)]
#[case(json!({"id": "ID", "name": "Renamed", "link": "https://new"}), true)]
#[actix_web::test]
async fn update_selects_by_id_before_name(#[case] mut body: Value, #[case] by_id: bool) {
    let tree_id = LinktreeId::random();
    let existing = link("G");
    let link_id = existing.id();
    if by_id {
        body["id"] = json!(link_id.to_string());
    }
    let mut ports = MockPorts::default();
    ports
        .linktrees
        .expect_update_link()
        .withf(move |_, _, selector, fields| {
            let selected = match selector {
                LinkMatch::Id(id) => by_id && *id == link_id,
                LinkMatch::Name(name) => !by_id && name == "G",
            };
            selected && fields.url() == "https://new"
        })
        .times(1)
        .returning(move |_, _, _, _| Ok(tree(tree_id, vec![existing.clone()])));

    let (status, _) = send(
        ports,
        test::TestRequest::post()
            .uri(&format!("/linktree/{tree_id}/updatelink"))
            .set_json(body),
        Some(UserId::random()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn delete_missing_link_is_bad_request() {
    let tree_id = LinktreeId::random();
    let mut ports = MockPorts::default();
    ports.linktrees.expect_delete_link().returning(|_, _, _| {
        Err(Error::invalid_request("link not found in linktree"))
    });

    let (status, body) = send(
        ports,
        test::TestRequest::delete()
            .uri(&format!("/linktree/{tree_id}/deletelink"))
            .set_json(json!({"id": LinkId::random().to_string()})),
        Some(UserId::random()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "link not found in linktree");
}

#[rstest]
#[case(ErrorCode::Forbidden, StatusCode::FORBIDDEN)]
#[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn ownership_failures_surface_status(#[case] code: ErrorCode, #[case] expected: StatusCode) {
    let mut ports = MockPorts::default();
    ports
        .linktrees
        .expect_set_fullname()
        .returning(move |_, _, _| Err(Error::new(code, "denied")));

    let (status, _) = send(
        ports,
        test::TestRequest::post()
            .uri(&format!("/linktree/{}/addfullname", LinktreeId::random()))
            .set_json(json!("Ada Lovelace")),
        Some(UserId::random()),
    )
    .await;
    assert_eq!(status, expected);
}

#[actix_web::test]
async fn malformed_json_is_bad_request_with_message() {
    let mut ports = MockPorts::default();
    ports.linktrees.expect_set_bio().never();

    let (status, body) = send(
        ports,
        test::TestRequest::post()
            .uri(&format!("/linktree/{}/addbio", LinktreeId::random()))
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
        Some(UserId::random()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "malformed_body");
}
