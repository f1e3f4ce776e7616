//! Lead capture gate: validated, idempotent collection of visitor contacts.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::json;
use std::sync::{Arc, LazyLock};
use tracing::info;
use uuid::Uuid;

use crate::domain::enrichment::{GeoData, GeoLocator, classify_client, settle};
use crate::domain::entities::{
    LeadCapture, LeadInsert, LeadOutcome, Link, NewLeadCapture, OwnerLeadCapture, Page,
    PageRequest,
};
use crate::domain::repositories::{LeadRepository, LinkRepository};
use crate::error::AppError;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

const NAME_MIN_CHARS: usize = 2;

pub const DEFAULT_LINK_PAGE_SIZE: u32 = 50;
pub const DEFAULT_OWNER_PAGE_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 500;

/// Which link a submission targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadTarget {
    LinkId(Uuid),
    ShortCode(String),
}

/// Optional request metadata stored with a lead.
#[derive(Debug, Clone, Default)]
pub struct LeadContext {
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub client_address: Option<String>,
    /// Client-reported capture time; the server clock is used when absent.
    pub captured_at: Option<DateTime<Utc>>,
}

pub struct LeadService<R: LeadRepository + ?Sized, L: LinkRepository + ?Sized> {
    lead_repository: Arc<R>,
    link_repository: Arc<L>,
    geo_locator: Arc<dyn GeoLocator>,
}

impl<R: LeadRepository + ?Sized, L: LinkRepository + ?Sized> LeadService<R, L> {
    pub fn new(
        lead_repository: Arc<R>,
        link_repository: Arc<L>,
        geo_locator: Arc<dyn GeoLocator>,
    ) -> Self {
        Self {
            lead_repository,
            link_repository,
            geo_locator,
        }
    }

    /// Submits a lead for a link.
    ///
    /// The email is trimmed and lower-cased before validation and storage.
    /// Re-submitting the same `(link, email)` pair is accepted without a new
    /// row or counter increment and reported as a duplicate.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed email or a name shorter than
    ///   two characters
    /// - [`AppError::NotFound`] if the target link does not exist
    pub async fn submit(
        &self,
        target: LeadTarget,
        email: &str,
        name: &str,
        context: LeadContext,
    ) -> Result<LeadOutcome, AppError> {
        let email = normalize_email(email)?;
        let name = normalize_name(name)?;

        let link = self.resolve_target(&target).await?;

        if self
            .lead_repository
            .find_by_link_and_email(link.id, &email)
            .await?
            .is_some()
        {
            return Ok(LeadOutcome::duplicate());
        }

        let client = classify_client(context.user_agent.as_deref().unwrap_or_default());
        let geo = match context.client_address.as_deref() {
            Some(address) => settle(self.geo_locator.locate(address).await),
            None => GeoData::unknown(),
        };

        let new_capture = NewLeadCapture {
            link_id: link.id,
            email,
            name,
            user_agent: context.user_agent,
            referrer: context.referrer,
            client_address: context.client_address,
            geo,
            client,
            captured_at: context.captured_at.unwrap_or_else(Utc::now),
        };

        match self.lead_repository.insert(new_capture).await? {
            LeadInsert::Created(capture) => {
                self.link_repository.increment_lead_count(link.id).await?;
                metrics::counter!("leads_captured_total").increment(1);
                info!(link_id = %link.id, lead_id = %capture.id, "Lead captured");
                Ok(LeadOutcome::created())
            }
            LeadInsert::Duplicate => Ok(LeadOutcome::duplicate()),
        }
    }

    /// Captures for one link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist and
    /// [`AppError::Validation`] for out-of-range paging.
    pub async fn list_for_link(
        &self,
        link_id: Uuid,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<Page<LeadCapture>, AppError> {
        let request = page_request(page, page_size, DEFAULT_LINK_PAGE_SIZE)?;

        if self.link_repository.find_by_id(link_id).await?.is_none() {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "id": link_id }),
            ));
        }

        let items = self.lead_repository.list_by_link(link_id, request).await?;
        let total = self.lead_repository.count_by_link(link_id).await?;

        Ok(Page::new(items, total, request))
    }

    /// Captures across all of an owner's links, newest first.
    pub async fn list_for_owner(
        &self,
        owner_id: &str,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<Page<OwnerLeadCapture>, AppError> {
        let request = page_request(page, page_size, DEFAULT_OWNER_PAGE_SIZE)?;

        let items = self.lead_repository.list_by_owner(owner_id, request).await?;
        let total = self.lead_repository.count_by_owner(owner_id).await?;

        Ok(Page::new(items, total, request))
    }

    async fn resolve_target(&self, target: &LeadTarget) -> Result<Link, AppError> {
        let found = match target {
            LeadTarget::LinkId(id) => self.link_repository.find_by_id(*id).await?,
            LeadTarget::ShortCode(code) => self.link_repository.find_by_code(code).await?,
        };

        found.ok_or_else(|| {
            let details = match target {
                LeadTarget::LinkId(id) => json!({ "link_id": id }),
                LeadTarget::ShortCode(code) => json!({ "short_code": code }),
            };
            AppError::not_found("Link not found", details)
        })
    }
}

/// Trims, lower-cases, and validates an email address.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();

    if !EMAIL_REGEX.is_match(&email) {
        return Err(AppError::bad_request(
            "Invalid email format",
            json!({ "field": "email" }),
        ));
    }

    Ok(email)
}

/// Trims a display name and enforces the minimum length.
pub fn normalize_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();

    if name.chars().count() < NAME_MIN_CHARS {
        return Err(AppError::bad_request(
            "Name must be at least 2 characters long",
            json!({ "field": "name" }),
        ));
    }

    Ok(name.to_string())
}

fn page_request(
    page: Option<u32>,
    page_size: Option<u32>,
    default_size: u32,
) -> Result<PageRequest, AppError> {
    let page = page.unwrap_or(1);
    let page_size = page_size.unwrap_or(default_size);

    if page == 0 {
        return Err(AppError::bad_request(
            "Page must be greater than 0",
            json!({ "field": "page" }),
        ));
    }

    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(AppError::bad_request(
            "Page size must be between 1 and 500",
            json!({ "field": "page_size", "provided": page_size }),
        ));
    }

    Ok(PageRequest { page, page_size })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrichment::{DeviceClass, MockGeoLocator};
    use crate::domain::entities::sample_link;
    use crate::domain::repositories::{MockLeadRepository, MockLinkRepository};

    fn service(
        leads: MockLeadRepository,
        links: MockLinkRepository,
        geo: MockGeoLocator,
    ) -> LeadService<MockLeadRepository, MockLinkRepository> {
        LeadService::new(Arc::new(leads), Arc::new(links), Arc::new(geo))
    }

    fn links_with(link: Link) -> MockLinkRepository {
        let mut links = MockLinkRepository::new();
        let by_code = link.clone();
        links
            .expect_find_by_code()
            .returning(move |_| Ok(Some(by_code.clone())));
        links
            .expect_find_by_id()
            .returning(move |_| Ok(Some(link.clone())));
        links
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Jane.Doe@Example.COM ").unwrap(),
            "jane.doe@example.com"
        );
        assert!(normalize_email("jane@example").is_err());
        assert!(normalize_email("jane example@x.io").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("").is_err());
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Jo ").unwrap(), "Jo");
        assert!(normalize_name(" J ").is_err());
        assert!(normalize_name("").is_err());
        assert_eq!(normalize_name("\u{c9}l").unwrap(), "\u{c9}l");
    }

    #[test]
    fn test_page_request_bounds() {
        assert_eq!(
            page_request(None, None, 50).unwrap(),
            PageRequest {
                page: 1,
                page_size: 50
            }
        );
        assert!(page_request(Some(0), None, 50).is_err());
        assert!(page_request(None, Some(0), 50).is_err());
        assert!(page_request(None, Some(501), 50).is_err());
        assert!(page_request(Some(3), Some(500), 50).is_ok());
    }

    #[tokio::test]
    async fn test_submit_creates_and_counts() {
        let link = sample_link("abc123");
        let link_id = link.id;

        let mut links = links_with(link);
        links
            .expect_increment_lead_count()
            .withf(move |id| *id == link_id)
            .times(1)
            .returning(|_| Ok(()));

        let mut leads = MockLeadRepository::new();
        leads
            .expect_find_by_link_and_email()
            .withf(|_, email| email == "jane@example.com")
            .times(1)
            .returning(|_, _| Ok(None));
        leads
            .expect_insert()
            .withf(|c| {
                c.email == "jane@example.com"
                    && c.name == "Jane"
                    && c.client.device == DeviceClass::Mobile
                    && c.geo.country.as_deref() == Some("Local")
            })
            .times(1)
            .returning(|c| Ok(LeadInsert::Created(c.into_capture(Uuid::new_v4()))));

        let mut geo = MockGeoLocator::new();
        geo.expect_locate().returning(|_| Ok(GeoData::local()));

        let context = LeadContext {
            user_agent: Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_1) Mobile".to_string()),
            client_address: Some("127.0.0.1".to_string()),
            ..Default::default()
        };

        let outcome = service(leads, links, geo)
            .submit(
                LeadTarget::ShortCode("abc123".to_string()),
                " Jane@Example.com ",
                " Jane ",
                context,
            )
            .await
            .unwrap();

        assert_eq!(outcome, LeadOutcome::created());
    }

    #[tokio::test]
    async fn test_submit_duplicate_is_idempotent() {
        let link = sample_link("abc123");
        let mut links = links_with(link.clone());
        links.expect_increment_lead_count().times(0);

        let mut leads = MockLeadRepository::new();
        let existing = NewLeadCapture {
            link_id: link.id,
            email: "jane@example.com".to_string(),
            name: "Jane".to_string(),
            user_agent: None,
            referrer: None,
            client_address: None,
            geo: GeoData::unknown(),
            client: classify_client(""),
            captured_at: Utc::now(),
        }
        .into_capture(Uuid::new_v4());
        leads
            .expect_find_by_link_and_email()
            .returning(move |_, _| Ok(Some(existing.clone())));
        leads.expect_insert().times(0);

        let outcome = service(leads, links, MockGeoLocator::new())
            .submit(
                LeadTarget::LinkId(link.id),
                "jane@example.com",
                "Jane",
                LeadContext::default(),
            )
            .await
            .unwrap();

        assert_eq!(outcome, LeadOutcome::duplicate());
    }

    #[tokio::test]
    async fn test_submit_insert_race_is_duplicate() {
        let link = sample_link("abc123");
        let mut links = links_with(link);
        links.expect_increment_lead_count().times(0);

        let mut leads = MockLeadRepository::new();
        leads
            .expect_find_by_link_and_email()
            .returning(|_, _| Ok(None));
        leads
            .expect_insert()
            .times(1)
            .returning(|_| Ok(LeadInsert::Duplicate));

        let outcome = service(leads, links, MockGeoLocator::new())
            .submit(
                LeadTarget::ShortCode("abc123".to_string()),
                "jane@example.com",
                "Jane",
                LeadContext::default(),
            )
            .await
            .unwrap();

        assert!(outcome.duplicate);
        assert!(outcome.accepted);
    }

    #[tokio::test]
    async fn test_submit_unknown_link() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().returning(|_| Ok(None));

        let result = service(MockLeadRepository::new(), links, MockGeoLocator::new())
            .submit(
                LeadTarget::ShortCode("missing".to_string()),
                "jane@example.com",
                "Jane",
                LeadContext::default(),
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_submit_validates_before_lookup() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().times(0);

        let svc = service(MockLeadRepository::new(), links, MockGeoLocator::new());

        let bad_email = svc
            .submit(
                LeadTarget::ShortCode("abc123".to_string()),
                "not-an-email",
                "Jane",
                LeadContext::default(),
            )
            .await;
        assert!(matches!(bad_email, Err(AppError::Validation { .. })));

        let short_name = svc
            .submit(
                LeadTarget::ShortCode("abc123".to_string()),
                "jane@example.com",
                "J",
                LeadContext::default(),
            )
            .await;
        assert!(matches!(short_name, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_submit_inactive_link_still_accepts() {
        let mut link = sample_link("paused");
        link.is_active = false;
        let mut links = links_with(link);
        links.expect_increment_lead_count().times(1).returning(|_| Ok(()));

        let mut leads = MockLeadRepository::new();
        leads
            .expect_find_by_link_and_email()
            .returning(|_, _| Ok(None));
        leads
            .expect_insert()
            .returning(|c| Ok(LeadInsert::Created(c.into_capture(Uuid::new_v4()))));

        let outcome = service(leads, links, MockGeoLocator::new())
            .submit(
                LeadTarget::ShortCode("paused".to_string()),
                "jane@example.com",
                "Jane",
                LeadContext::default(),
            )
            .await
            .unwrap();

        assert!(!outcome.duplicate);
    }

    #[tokio::test]
    async fn test_submit_uses_supplied_timestamp() {
        let link = sample_link("abc123");
        let mut links = links_with(link);
        links.expect_increment_lead_count().returning(|_| Ok(()));

        let supplied = Utc::now() - chrono::Duration::minutes(3);
        let mut leads = MockLeadRepository::new();
        leads
            .expect_find_by_link_and_email()
            .returning(|_, _| Ok(None));
        leads
            .expect_insert()
            .withf(move |c| c.captured_at == supplied)
            .times(1)
            .returning(|c| Ok(LeadInsert::Created(c.into_capture(Uuid::new_v4()))));

        let context = LeadContext {
            captured_at: Some(supplied),
            ..Default::default()
        };
        let result = service(leads, links, MockGeoLocator::new())
            .submit(
                LeadTarget::ShortCode("abc123".to_string()),
                "jane@example.com",
                "Jane",
                context,
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_list_for_link_pages() {
        let link = sample_link("abc123");
        let link_id = link.id;
        let links = links_with(link);

        let mut leads = MockLeadRepository::new();
        leads
            .expect_list_by_link()
            .withf(|_, p| p.page == 2 && p.page_size == 10)
            .returning(|_, _| Ok(Vec::new()));
        leads.expect_count_by_link().returning(|_| Ok(25));

        let page = service(leads, links, MockGeoLocator::new())
            .list_for_link(link_id, Some(2), Some(10))
            .await
            .unwrap();

        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_prev());
    }

    #[tokio::test]
    async fn test_list_for_unknown_link() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_id().returning(|_| Ok(None));

        let result = service(MockLeadRepository::new(), links, MockGeoLocator::new())
            .list_for_link(Uuid::new_v4(), None, None)
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_for_owner_defaults_to_hundred() {
        let mut leads = MockLeadRepository::new();
        leads
            .expect_list_by_owner()
            .withf(|owner, p| owner == "user-1" && p.page_size == DEFAULT_OWNER_PAGE_SIZE)
            .returning(|_, _| Ok(Vec::new()));
        leads.expect_count_by_owner().returning(|_| Ok(0));

        let page = service(leads, MockLinkRepository::new(), MockGeoLocator::new())
            .list_for_owner("user-1", None, None)
            .await
            .unwrap();

        assert_eq!(page.page_size, 100);
        assert!(!page.has_next());
    }
}
