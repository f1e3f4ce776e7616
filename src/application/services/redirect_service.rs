//! Resolve-and-track: the composed operation behind the redirect endpoints.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{error, warn};

use crate::application::services::LinkService;
use crate::domain::click_event::ClickEvent;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Request metadata captured at the redirect edge.
#[derive(Debug, Clone, Default)]
pub struct VisitorContext {
    pub client_address: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub session_id: Option<String>,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub destination_url: String,
    pub link: Link,
}

pub struct RedirectService<L: LinkRepository + ?Sized> {
    link_service: Arc<LinkService<L>>,
    click_sender: mpsc::Sender<ClickEvent>,
}

impl<L: LinkRepository + ?Sized> RedirectService<L> {
    pub fn new(link_service: Arc<LinkService<L>>, click_sender: mpsc::Sender<ClickEvent>) -> Self {
        Self {
            link_service,
            click_sender,
        }
    }

    /// Resolves a short code and schedules click recording.
    ///
    /// The destination is decided before the click is queued; recording runs
    /// on the background worker and never delays or fails the caller. When the
    /// queue is full the click is dropped and counted in
    /// `clicks_dropped_total`.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for unknown or deactivated codes
    /// - [`AppError::Expired`] for links past their expiry
    pub async fn resolve_and_track(
        &self,
        code: &str,
        visitor: &VisitorContext,
    ) -> Result<Resolution, AppError> {
        let link = self
            .link_service
            .get_by_short_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "code": code })))?;

        if link.is_expired_at(Utc::now()) {
            return Err(AppError::expired(
                "Link has expired",
                json!({ "code": code, "expires_at": link.expires_at }),
            ));
        }

        let event = ClickEvent::new(
            link.id,
            visitor.client_address.clone(),
            visitor.user_agent.as_deref(),
            visitor.referrer.as_deref(),
            visitor.session_id.as_deref(),
        );
        self.dispatch(event);

        Ok(Resolution {
            destination_url: link.destination_url.clone(),
            link,
        })
    }

    fn dispatch(&self, event: ClickEvent) {
        match self.click_sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(ev)) => {
                warn!(link_id = %ev.link_id, "Click queue full, dropping click");
                metrics::counter!("clicks_dropped_total", "reason" => "queue_full").increment(1);
            }
            Err(TrySendError::Closed(ev)) => {
                error!(link_id = %ev.link_id, "Click queue closed, dropping click");
                metrics::counter!("clicks_dropped_total", "reason" => "queue_closed").increment(1);
            }
        }
    }
}
