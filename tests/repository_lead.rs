use chrono::{Duration, Utc};
use link_tracker::domain::enrichment::{GeoData, classify_client};
use link_tracker::domain::entities::{LeadInsert, NewLeadCapture, NewLink, PageRequest};
use link_tracker::domain::repositories::{LeadRepository, LinkRepository};
use link_tracker::infrastructure::persistence::{PgLeadRepository, PgLinkRepository};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

async fn seed_link(pool: &Arc<PgPool>, owner: &str, code: &str) -> Uuid {
    PgLinkRepository::new(pool.clone())
        .create(NewLink {
            owner_id: owner.to_string(),
            short_code: code.to_string(),
            destination_url: format!("https://example.com/{code}"),
            custom_alias: Some(code.to_string()),
            title: Some(format!("Title {code}")),
            description: None,
            expires_at: None,
            lead_capture_enabled: true,
        })
        .await
        .unwrap()
        .id
}

fn new_lead(link_id: Uuid, email: &str, minutes_ago: i64) -> NewLeadCapture {
    NewLeadCapture {
        link_id,
        email: email.to_string(),
        name: "Ada".to_string(),
        user_agent: Some("Mozilla/5.0 (Linux; Android 14) Mobile".to_string()),
        referrer: None,
        client_address: Some("203.0.113.9".to_string()),
        geo: GeoData::unknown(),
        client: classify_client("Mozilla/5.0 (Linux; Android 14) Mobile"),
        captured_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

fn page(page: u32, page_size: u32) -> PageRequest {
    PageRequest { page, page_size }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_and_duplicate(pool: PgPool) {
    let pool = Arc::new(pool);
    let link_id = seed_link(&pool, "user-1", "lead01").await;
    let repo = PgLeadRepository::new(pool);

    let created = repo.insert(new_lead(link_id, "ada@example.com", 0)).await.unwrap();
    let LeadInsert::Created(capture) = created else {
        panic!("expected a new capture");
    };
    assert_eq!(capture.email, "ada@example.com");
    assert!(capture.client.is_mobile);

    let again = repo.insert(new_lead(link_id, "ada@example.com", 0)).await.unwrap();
    assert_eq!(again, LeadInsert::Duplicate);

    let found = repo
        .find_by_link_and_email(link_id, "ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, capture.id);
    assert_eq!(repo.count_by_link(link_id).await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_same_email_on_different_links(pool: PgPool) {
    let pool = Arc::new(pool);
    let a = seed_link(&pool, "user-1", "lead02").await;
    let b = seed_link(&pool, "user-1", "lead03").await;
    let repo = PgLeadRepository::new(pool);

    assert!(matches!(
        repo.insert(new_lead(a, "ada@example.com", 0)).await.unwrap(),
        LeadInsert::Created(_)
    ));
    assert!(matches!(
        repo.insert(new_lead(b, "ada@example.com", 0)).await.unwrap(),
        LeadInsert::Created(_)
    ));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_by_link_paginated_newest_first(pool: PgPool) {
    let pool = Arc::new(pool);
    let link_id = seed_link(&pool, "user-1", "lead04").await;
    let repo = PgLeadRepository::new(pool);

    for i in 0..5 {
        repo.insert(new_lead(link_id, &format!("v{i}@example.com"), i))
            .await
            .unwrap();
    }

    let first = repo.list_by_link(link_id, page(1, 2)).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].email, "v0@example.com");
    assert_eq!(first[1].email, "v1@example.com");

    let last = repo.list_by_link(link_id, page(3, 2)).await.unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].email, "v4@example.com");

    assert_eq!(repo.count_by_link(link_id).await.unwrap(), 5);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_by_owner_joins_link(pool: PgPool) {
    let pool = Arc::new(pool);
    let mine = seed_link(&pool, "user-1", "lead05").await;
    let theirs = seed_link(&pool, "user-2", "lead06").await;
    let repo = PgLeadRepository::new(pool);

    repo.insert(new_lead(mine, "ada@example.com", 1)).await.unwrap();
    repo.insert(new_lead(theirs, "bob@example.com", 0)).await.unwrap();

    let rows = repo.list_by_owner("user-1", page(1, 100)).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].capture.email, "ada@example.com");
    assert_eq!(rows[0].short_code, "lead05");
    assert_eq!(rows[0].link_title.as_deref(), Some("Title lead05"));
    assert_eq!(rows[0].destination_url, "https://example.com/lead05");
    assert_eq!(repo.count_by_owner("user-1").await.unwrap(), 1);
    assert_eq!(repo.count_by_owner("nobody").await.unwrap(), 0);
}
