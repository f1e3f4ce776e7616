//! Process-local store implementing every repository trait.
//!
//! Used for local development (`STORAGE_BACKEND=memory`) and handler tests.
//! All state sits behind one mutex, so each trait method is a single critical
//! section and the atomicity guarantees of the PostgreSQL repositories hold.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::domain::entities::{
    Click, LeadCapture, LeadInsert, Link, NewClick, NewLeadCapture, NewLink, OwnerLeadCapture,
    PageRequest, same_local_day,
};
use crate::domain::repositories::{ClickRepository, LeadRepository, LinkRepository};
use crate::error::AppError;

#[derive(Default)]
struct State {
    links: HashMap<Uuid, Link>,
    codes: HashMap<String, Uuid>,
    clicks: Vec<Click>,
    leads: Vec<LeadCapture>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_link<F>(&self, id: Uuid, update: F)
    where
        F: FnOnce(&mut Link),
    {
        if let Some(link) = self.state().links.get_mut(&id) {
            update(link);
            link.updated_at = Utc::now();
        }
    }
}

fn page_slice<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect()
}

fn newest_first(leads: &mut [LeadCapture]) {
    leads.sort_by(|a, b| b.captured_at.cmp(&a.captured_at).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut state = self.state();

        if state.codes.contains_key(&new_link.short_code) {
            return Err(AppError::alias_taken(
                "Short code is already taken",
                json!({ "short_code": new_link.short_code }),
            ));
        }

        let now = Utc::now();
        let link = Link {
            id: Uuid::new_v4(),
            owner_id: new_link.owner_id,
            short_code: new_link.short_code,
            destination_url: new_link.destination_url,
            custom_alias: new_link.custom_alias,
            title: new_link.title,
            description: new_link.description,
            is_active: true,
            expires_at: new_link.expires_at,
            lead_capture_enabled: new_link.lead_capture_enabled,
            total_clicks: 0,
            unique_clicks: 0,
            lead_captures: 0,
            created_at: now,
            updated_at: now,
        };

        state.codes.insert(link.short_code.clone(), link.id);
        state.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError> {
        Ok(self.state().links.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let state = self.state();
        Ok(state
            .codes
            .get(code)
            .and_then(|id| state.links.get(id))
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self
            .state()
            .links
            .values()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(links)
    }

    async fn increment_counters(&self, id: Uuid, unique: bool) -> Result<(), AppError> {
        self.with_link(id, |link| {
            link.total_clicks += 1;
            if unique {
                link.unique_clicks += 1;
            }
        });
        Ok(())
    }

    async fn increment_lead_count(&self, id: Uuid) -> Result<(), AppError> {
        self.with_link(id, |link| link.lead_captures += 1);
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl ClickRepository for InMemoryStore {
    async fn record(&self, click: NewClick) -> Result<Click, AppError> {
        let mut state = self.state();

        let seen_today = state.clicks.iter().any(|c| {
            c.link_id == click.link_id
                && c.client_address == click.client_address
                && same_local_day(c.clicked_at, click.clicked_at)
        });

        let click = click.into_click(Uuid::new_v4(), !seen_today);
        state.clicks.push(click.clone());

        Ok(click)
    }

    async fn list_for_link(&self, link_id: Uuid) -> Result<Vec<Click>, AppError> {
        let mut clicks: Vec<Click> = self
            .state()
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect();
        clicks.sort_by_key(|c| c.clicked_at);
        Ok(clicks)
    }
}

#[async_trait]
impl LeadRepository for InMemoryStore {
    async fn find_by_link_and_email(
        &self,
        link_id: Uuid,
        email: &str,
    ) -> Result<Option<LeadCapture>, AppError> {
        Ok(self
            .state()
            .leads
            .iter()
            .find(|l| l.link_id == link_id && l.email == email)
            .cloned())
    }

    async fn insert(&self, capture: NewLeadCapture) -> Result<LeadInsert, AppError> {
        let mut state = self.state();

        if state
            .leads
            .iter()
            .any(|l| l.link_id == capture.link_id && l.email == capture.email)
        {
            return Ok(LeadInsert::Duplicate);
        }

        let capture = capture.into_capture(Uuid::new_v4());
        state.leads.push(capture.clone());

        Ok(LeadInsert::Created(capture))
    }

    async fn list_by_link(
        &self,
        link_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<LeadCapture>, AppError> {
        let mut leads: Vec<LeadCapture> = self
            .state()
            .leads
            .iter()
            .filter(|l| l.link_id == link_id)
            .cloned()
            .collect();
        newest_first(&mut leads);
        Ok(page_slice(&leads, page))
    }

    async fn count_by_link(&self, link_id: Uuid) -> Result<i64, AppError> {
        Ok(self
            .state()
            .leads
            .iter()
            .filter(|l| l.link_id == link_id)
            .count() as i64)
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
        page: PageRequest,
    ) -> Result<Vec<OwnerLeadCapture>, AppError> {
        let state = self.state();

        let mut leads: Vec<LeadCapture> = state
            .leads
            .iter()
            .filter(|l| {
                state
                    .links
                    .get(&l.link_id)
                    .is_some_and(|link| link.owner_id == owner_id)
            })
            .cloned()
            .collect();
        newest_first(&mut leads);

        Ok(page_slice(&leads, page)
            .into_iter()
            .filter_map(|capture| {
                let link = state.links.get(&capture.link_id)?;
                Some(OwnerLeadCapture {
                    link_title: link.title.clone(),
                    short_code: link.short_code.clone(),
                    destination_url: link.destination_url.clone(),
                    capture,
                })
            })
            .collect())
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError> {
        let state = self.state();
        Ok(state
            .leads
            .iter()
            .filter(|l| {
                state
                    .links
                    .get(&l.link_id)
                    .is_some_and(|link| link.owner_id == owner_id)
            })
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrichment::{GeoData, classify_client};
    use chrono::Duration;
    use std::sync::Arc;

    fn new_link(code: &str, owner: &str) -> NewLink {
        NewLink {
            owner_id: owner.to_string(),
            short_code: code.to_string(),
            destination_url: "https://example.com".to_string(),
            custom_alias: None,
            title: Some(format!("Title {code}")),
            description: None,
            expires_at: None,
            lead_capture_enabled: false,
        }
    }

    fn new_click(link_id: Uuid, address: &str, at: chrono::DateTime<Utc>) -> NewClick {
        NewClick {
            link_id,
            client_address: address.to_string(),
            user_agent: String::new(),
            referrer: None,
            geo: GeoData::unknown(),
            client: classify_client(""),
            session_id: None,
            clicked_at: at,
        }
    }

    fn new_lead(link_id: Uuid, email: &str, at: chrono::DateTime<Utc>) -> NewLeadCapture {
        NewLeadCapture {
            link_id,
            email: email.to_string(),
            name: "Jane".to_string(),
            user_agent: None,
            referrer: None,
            client_address: None,
            geo: GeoData::unknown(),
            client: classify_client(""),
            captured_at: at,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_taken_code() {
        let store = InMemoryStore::new();
        store.create(new_link("abc123", "u1")).await.unwrap();

        let result = store.create(new_link("abc123", "u2")).await;
        assert!(matches!(result, Err(AppError::AliasTaken { .. })));
    }

    #[tokio::test]
    async fn test_codes_are_case_sensitive() {
        let store = InMemoryStore::new();
        store.create(new_link("abc123", "u1")).await.unwrap();

        assert!(store.create(new_link("ABC123", "u1")).await.is_ok());
        assert!(store.find_by_code("Abc123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_click_uniqueness_per_day() {
        let store = InMemoryStore::new();
        let link = store.create(new_link("abc123", "u1")).await.unwrap();
        let now = Utc::now();

        let first = store.record(new_click(link.id, "1.1.1.1", now)).await.unwrap();
        let second = store.record(new_click(link.id, "1.1.1.1", now)).await.unwrap();
        let other = store.record(new_click(link.id, "2.2.2.2", now)).await.unwrap();
        let tomorrow = store
            .record(new_click(link.id, "1.1.1.1", now + Duration::days(1)))
            .await
            .unwrap();

        assert!(first.is_unique);
        assert!(!second.is_unique);
        assert!(other.is_unique);
        assert!(tomorrow.is_unique);
    }

    #[tokio::test]
    async fn test_concurrent_counter_increments() {
        let store = Arc::new(InMemoryStore::new());
        let link_id = store.create(new_link("abc123", "u1")).await.unwrap().id;

        let mut handles = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.increment_counters(link_id, i % 2 == 0).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let link = store.find_by_id(link_id).await.unwrap().unwrap();
        assert_eq!(link.total_clicks, 50);
        assert_eq!(link.unique_clicks, 25);
    }

    #[tokio::test]
    async fn test_lead_duplicate_and_listing_order() {
        let store = InMemoryStore::new();
        let link = store.create(new_link("abc123", "u1")).await.unwrap();
        let other = store.create(new_link("xyz789", "u2")).await.unwrap();
        let now = Utc::now();

        store
            .insert(new_lead(link.id, "a@x.io", now - Duration::minutes(2)))
            .await
            .unwrap();
        store.insert(new_lead(link.id, "b@x.io", now)).await.unwrap();
        store.insert(new_lead(other.id, "c@x.io", now)).await.unwrap();

        let dup = store.insert(new_lead(link.id, "a@x.io", now)).await.unwrap();
        assert_eq!(dup, LeadInsert::Duplicate);

        let page = PageRequest {
            page: 1,
            page_size: 10,
        };
        let leads = store.list_by_link(link.id, page).await.unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].email, "b@x.io");
        assert_eq!(store.count_by_link(link.id).await.unwrap(), 2);

        let owned = LeadRepository::list_by_owner(&store, "u1", page)
            .await
            .unwrap();
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[0].short_code, "abc123");
        assert_eq!(owned[0].link_title.as_deref(), Some("Title abc123"));
        assert_eq!(LeadRepository::count_by_owner(&store, "u2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_lead_pagination() {
        let store = InMemoryStore::new();
        let link = store.create(new_link("abc123", "u1")).await.unwrap();
        let now = Utc::now();

        for i in 0..5 {
            store
                .insert(new_lead(link.id, &format!("{i}@x.io"), now + Duration::seconds(i)))
                .await
                .unwrap();
        }

        let second = store
            .list_by_link(
                link.id,
                PageRequest {
                    page: 2,
                    page_size: 2,
                },
            )
            .await
            .unwrap();

        assert_eq!(second.len(), 2);
        assert_eq!(second[0].email, "2@x.io");
        assert_eq!(second[1].email, "1@x.io");
    }
}
