//! Click recorder: enrichment, persistence, and counter updates for one click.

use std::sync::Arc;
use tracing::debug;

use crate::domain::click_event::ClickEvent;
use crate::domain::enrichment::{GeoLocator, classify_client, settle};
use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Turns an accepted [`ClickEvent`] into a persisted, counted [`Click`].
pub struct ClickRecorder<C: ClickRepository + ?Sized, L: LinkRepository + ?Sized> {
    click_repository: Arc<C>,
    link_repository: Arc<L>,
    geo_locator: Arc<dyn GeoLocator>,
}

impl<C: ClickRepository + ?Sized, L: LinkRepository + ?Sized> ClickRecorder<C, L> {
    pub fn new(
        click_repository: Arc<C>,
        link_repository: Arc<L>,
        geo_locator: Arc<dyn GeoLocator>,
    ) -> Self {
        Self {
            click_repository,
            link_repository,
            geo_locator,
        }
    }

    /// Records one click.
    ///
    /// # Steps
    ///
    /// 1. Classify the user agent
    /// 2. Geolocate the client address (bounded by the locator's timeout)
    /// 3. Persist the click; the repository decides uniqueness atomically
    /// 4. Increment the link's counters
    ///
    /// Geolocation failures are already absorbed into `Unknown` values. A
    /// persistence failure aborts before any counter is touched.
    pub async fn record(&self, event: ClickEvent) -> Result<Click, AppError> {
        let user_agent = event.user_agent.unwrap_or_default();
        let client = classify_client(&user_agent);
        let geo = settle(self.geo_locator.locate(&event.client_address).await);

        let click = self
            .click_repository
            .record(NewClick {
                link_id: event.link_id,
                client_address: event.client_address,
                user_agent,
                referrer: event.referrer,
                geo,
                client,
                session_id: event.session_id,
                clicked_at: event.received_at,
            })
            .await?;

        self.link_repository
            .increment_counters(click.link_id, click.is_unique)
            .await?;

        debug!(
            link_id = %click.link_id,
            unique = click.is_unique,
            country = click.geo.country.as_deref().unwrap_or("-"),
            "Click recorded"
        );

        Ok(click)
    }
}
