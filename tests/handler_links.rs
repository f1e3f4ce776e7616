mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_link_success() {
    let ctx = common::create_test_context();
    let server = common::test_server(ctx.state.clone());

    let response = server
        .post("/api/links")
        .add_header("X-User-Id", common::OWNER)
        .json(&json!({
            "url": "https://example.com/landing",
            "title": "  Landing  ",
            "lead_capture_enabled": true
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    let code = json["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(json["short_url"], format!("{}/{}", common::BASE_URL, code));
    assert_eq!(json["destination_url"], "https://example.com/landing");
    assert_eq!(json["title"], "Landing");
    assert_eq!(json["lead_capture_enabled"], true);
    assert_eq!(json["is_active"], true);
    assert_eq!(json["total_clicks"], 0);
}

#[tokio::test]
async fn test_create_link_with_alias() {
    let ctx = common::create_test_context();
    let server = common::test_server(ctx.state.clone());

    let response = server
        .post("/api/links")
        .add_header("X-User-Id", common::OWNER)
        .json(&json!({ "url": "https://example.com", "custom_alias": "Promo24" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["short_code"], "Promo24");
    assert_eq!(json["custom_alias"], "Promo24");
}

#[tokio::test]
async fn test_create_link_alias_taken() {
    let ctx = common::create_test_context();
    common::create_capture_link(&ctx.state, common::OTHER_OWNER, "taken1").await;
    let server = common::test_server(ctx.state.clone());

    let response = server
        .post("/api/links")
        .add_header("X-User-Id", common::OWNER)
        .json(&json!({ "url": "https://example.com", "custom_alias": "taken1" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "alias_taken");

    let mine = ctx.state.link_service.list_for_owner(common::OWNER).await.unwrap();
    assert!(mine.is_empty());

    let theirs = ctx
        .state
        .link_service
        .list_for_owner(common::OTHER_OWNER)
        .await
        .unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].short_code, "taken1");
}

#[tokio::test]
async fn test_create_link_validation_errors() {
    let ctx = common::create_test_context();
    let server = common::test_server(ctx.state.clone());

    for body in [
        json!({ "url": "not-a-url" }),
        json!({ "url": "ftp://example.com/file" }),
        json!({ "url": "https://example.com", "custom_alias": "ab" }),
        json!({ "url": "https://example.com", "custom_alias": "has-dash" }),
        json!({ "url": "https://example.com", "expires_at": "2000-01-01T00:00:00Z" }),
    ] {
        let response = server
            .post("/api/links")
            .add_header("X-User-Id", common::OWNER)
            .json(&body)
            .await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "validation_error", "body: {body}");
    }
}

#[tokio::test]
async fn test_owner_routes_require_identity() {
    let ctx = common::create_test_context();
    let server = common::test_server(ctx.state.clone());

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com" }))
        .await;
    response.assert_status_unauthorized();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "unauthorized");

    server.get("/api/links").await.assert_status_unauthorized();
    server.get("/api/leads").await.assert_status_unauthorized();
}

#[tokio::test]
async fn test_list_links_only_own_newest_first() {
    let ctx = common::create_test_context();
    let first = common::create_link(&ctx.state, common::OWNER, "https://example.com/1").await;
    let second = common::create_link(&ctx.state, common::OWNER, "https://example.com/2").await;
    common::create_link(&ctx.state, common::OTHER_OWNER, "https://example.com/x").await;
    let server = common::test_server(ctx.state.clone());

    let response = server
        .get("/api/links")
        .add_header("X-User-Id", common::OWNER)
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], second.id.to_string());
    assert_eq!(items[1]["id"], first.id.to_string());
}

#[tokio::test]
async fn test_get_link_ownership() {
    let ctx = common::create_test_context();
    let link = common::create_link(&ctx.state, common::OWNER, "https://example.com").await;
    let server = common::test_server(ctx.state.clone());

    server
        .get(&format!("/api/links/{}", link.id))
        .add_header("X-User-Id", common::OWNER)
        .await
        .assert_status_ok();

    let response = server
        .get(&format!("/api/links/{}", link.id))
        .add_header("X-User-Id", common::OTHER_OWNER)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "forbidden");
}

#[tokio::test]
async fn test_get_link_not_found() {
    let ctx = common::create_test_context();
    let server = common::test_server(ctx.state.clone());

    let response = server
        .get(&format!("/api/links/{}", uuid::Uuid::new_v4()))
        .add_header("X-User-Id", common::OWNER)
        .await;

    response.assert_status_not_found();
}
