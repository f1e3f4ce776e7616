//! Analytics read path for a single link.

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::analytics::{AnalyticsSummary, summarize};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

pub struct AnalyticsService<C: ClickRepository + ?Sized, L: LinkRepository + ?Sized> {
    click_repository: Arc<C>,
    link_repository: Arc<L>,
}

impl<C: ClickRepository + ?Sized, L: LinkRepository + ?Sized> AnalyticsService<C, L> {
    pub fn new(click_repository: Arc<C>, link_repository: Arc<L>) -> Self {
        Self {
            click_repository,
            link_repository,
        }
    }

    /// Aggregates the full click history of a link.
    ///
    /// A link with no clicks yields zero counts and empty groupings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn get_analytics(&self, link_id: Uuid) -> Result<AnalyticsSummary, AppError> {
        if self.link_repository.find_by_id(link_id).await?.is_none() {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "id": link_id }),
            ));
        }

        let clicks = self.click_repository.list_for_link(link_id).await?;
        Ok(summarize(link_id, clicks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrichment::{GeoData, classify_client};
    use crate::domain::entities::{NewClick, sample_link};
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use chrono::{Duration, Utc};

    fn click(link_id: Uuid, address: &str, minutes_ago: i64) -> crate::domain::entities::Click {
        NewClick {
            link_id,
            client_address: address.to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0) Chrome/120.0".to_string(),
            referrer: Some("https://news.example/a".to_string()),
            geo: GeoData::unknown(),
            client: classify_client("Mozilla/5.0 (Windows NT 10.0) Chrome/120.0"),
            session_id: None,
            clicked_at: Utc::now() - Duration::minutes(minutes_ago),
        }
        .into_click(Uuid::new_v4(), true)
    }

    #[tokio::test]
    async fn test_get_analytics_summarizes_history() {
        let link = sample_link("abc123");
        let link_id = link.id;

        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .returning(move |_| Ok(Some(link.clone())));

        let mut clicks = MockClickRepository::new();
        clicks.expect_list_for_link().times(1).returning(move |id| {
            Ok(vec![click(id, "1.1.1.1", 3), click(id, "1.1.1.1", 2), click(id, "2.2.2.2", 1)])
        });

        let summary = AnalyticsService::new(Arc::new(clicks), Arc::new(links))
            .get_analytics(link_id)
            .await
            .unwrap();

        assert_eq!(summary.total_clicks, 3);
        assert_eq!(summary.unique_clicks, 2);
        assert_eq!(summary.clicks_by_country.get("Unknown"), Some(&3));
        assert_eq!(summary.top_referrers[0].domain, "news.example");
    }

    #[tokio::test]
    async fn test_get_analytics_empty_link() {
        let link = sample_link("quiet");
        let link_id = link.id;

        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .returning(move |_| Ok(Some(link.clone())));

        let mut clicks = MockClickRepository::new();
        clicks.expect_list_for_link().returning(|_| Ok(Vec::new()));

        let summary = AnalyticsService::new(Arc::new(clicks), Arc::new(links))
            .get_analytics(link_id)
            .await
            .unwrap();

        assert_eq!(summary, AnalyticsSummary::empty(link_id));
    }

    #[tokio::test]
    async fn test_get_analytics_unknown_link() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_id().returning(|_| Ok(None));

        let mut clicks = MockClickRepository::new();
        clicks.expect_list_for_link().times(0);

        let result = AnalyticsService::new(Arc::new(clicks), Arc::new(links))
            .get_analytics(Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
