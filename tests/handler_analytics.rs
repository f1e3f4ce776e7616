mod common;

use axum::http::StatusCode;
use link_tracker::domain::click_event::ClickEvent;
use link_tracker::infrastructure::geoip::DisabledLocator;
use link_tracker::state::click_recorder;
use std::sync::Arc;

const CHROME_DESKTOP: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";
const SAFARI_IPHONE: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Version/17.0 Mobile Safari/604.1";
const GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

#[tokio::test]
async fn test_analytics_summary() {
    let ctx = common::create_test_context();
    let link = common::create_link(&ctx.state, common::OWNER, "https://example.com").await;
    let recorder = click_recorder(&ctx.storage, Arc::new(DisabledLocator));

    let visits = [
        ("203.0.113.5", Some(CHROME_DESKTOP), Some("https://t.co/a")),
        ("203.0.113.5", Some(CHROME_DESKTOP), Some("https://t.co/b")),
        ("127.0.0.1", Some(SAFARI_IPHONE), None),
        ("198.51.100.9", Some(GOOGLEBOT), Some("https://news.ycombinator.com/")),
    ];
    for (address, ua, referrer) in visits {
        recorder
            .record(ClickEvent::new(link.id, address.to_string(), ua, referrer, None))
            .await
            .unwrap();
    }

    let server = common::test_server(ctx.state.clone());
    let response = server
        .get(&format!("/api/links/{}/analytics", link.id))
        .add_header("X-User-Id", common::OWNER)
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();

    assert_eq!(json["link_id"], link.id.to_string());
    assert_eq!(json["total_clicks"], 4);
    assert_eq!(json["unique_clicks"], 3);
    assert_eq!(json["bot_clicks"], 1);

    assert_eq!(json["clicks_by_country"]["Unknown"], 3);
    assert_eq!(json["clicks_by_country"]["Local"], 1);
    assert_eq!(json["clicks_by_device"]["Desktop"], 3);
    assert_eq!(json["clicks_by_device"]["Mobile"], 1);
    assert_eq!(json["clicks_by_browser"]["Chrome"], 2);
    assert_eq!(json["clicks_by_browser"]["Safari"], 1);
    assert_eq!(json["clicks_by_os"]["iOS"], 1);

    let days = json["clicks_by_day"].as_object().unwrap();
    assert_eq!(days.values().map(|v| v.as_u64().unwrap()).sum::<u64>(), 4);

    let referrers = json["top_referrers"].as_array().unwrap();
    assert_eq!(referrers[0]["domain"], "t.co");
    assert_eq!(referrers[0]["count"], 2);
    assert_eq!(referrers.len(), 3);

    let recent = json["recent_clicks"].as_array().unwrap();
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[0]["is_bot"], true);
    assert!(recent[0].get("client_address").is_none());

    // Counters on the link agree with the per-day uniqueness decided at insert.
    let stored = ctx.state.link_service.get_link(link.id).await.unwrap();
    assert_eq!(stored.total_clicks, 4);
    assert_eq!(stored.unique_clicks, 3);
}

#[tokio::test]
async fn test_analytics_empty_link() {
    let ctx = common::create_test_context();
    let link = common::create_link(&ctx.state, common::OWNER, "https://example.com").await;
    let server = common::test_server(ctx.state.clone());

    let response = server
        .get(&format!("/api/links/{}/analytics", link.id))
        .add_header("X-User-Id", common::OWNER)
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total_clicks"], 0);
    assert_eq!(json["unique_clicks"], 0);
    assert!(json["top_referrers"].as_array().unwrap().is_empty());
    assert!(json["clicks_by_day"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_analytics_ownership_and_missing() {
    let ctx = common::create_test_context();
    let link = common::create_link(&ctx.state, common::OWNER, "https://example.com").await;
    let server = common::test_server(ctx.state.clone());

    server
        .get(&format!("/api/links/{}/analytics", link.id))
        .add_header("X-User-Id", common::OTHER_OWNER)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    server
        .get(&format!("/api/links/{}/analytics", uuid::Uuid::new_v4()))
        .add_header("X-User-Id", common::OWNER)
        .await
        .assert_status_not_found();

    server
        .get(&format!("/api/links/{}/analytics", link.id))
        .await
        .assert_status_unauthorized();
}
