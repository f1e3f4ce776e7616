//! Shared application state injected into every handler.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{
    AnalyticsService, ClickRecorder, LeadService, LinkService, RedirectService,
};
use crate::domain::click_event::ClickEvent;
use crate::domain::enrichment::GeoLocator;
use crate::domain::repositories::{ClickRepository, LeadRepository, LinkRepository};
use crate::infrastructure::persistence::Storage;

pub type DynLinkService = LinkService<dyn LinkRepository>;
pub type DynRedirectService = RedirectService<dyn LinkRepository>;
pub type DynLeadService = LeadService<dyn LeadRepository, dyn LinkRepository>;
pub type DynAnalyticsService = AnalyticsService<dyn ClickRepository, dyn LinkRepository>;
pub type DynClickRecorder = ClickRecorder<dyn ClickRepository, dyn LinkRepository>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub redirect_service: Arc<DynRedirectService>,
    pub lead_service: Arc<DynLeadService>,
    pub analytics_service: Arc<DynAnalyticsService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Target of error redirects from `/r/{code}/direct`.
    pub frontend_url: String,
    /// Read client addresses from forwarding headers.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires every service over `storage`.
    pub fn new(
        storage: &Storage,
        geo_locator: Arc<dyn GeoLocator>,
        click_sender: mpsc::Sender<ClickEvent>,
        public_base_url: &str,
        frontend_url: &str,
        behind_proxy: bool,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(storage.links.clone(), public_base_url));
        let redirect_service = Arc::new(RedirectService::new(
            link_service.clone(),
            click_sender.clone(),
        ));
        let lead_service = Arc::new(LeadService::new(
            storage.leads.clone(),
            storage.links.clone(),
            geo_locator,
        ));
        let analytics_service = Arc::new(AnalyticsService::new(
            storage.clicks.clone(),
            storage.links.clone(),
        ));

        Self {
            link_service,
            redirect_service,
            lead_service,
            analytics_service,
            click_sender,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
            behind_proxy,
        }
    }
}

/// Builds the recorder consumed by the background click worker.
pub fn click_recorder(storage: &Storage, geo_locator: Arc<dyn GeoLocator>) -> Arc<DynClickRecorder> {
    Arc::new(ClickRecorder::new(
        storage.clicks.clone(),
        storage.links.clone(),
        geo_locator,
    ))
}
