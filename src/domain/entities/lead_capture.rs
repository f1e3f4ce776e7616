//! Lead capture entity: a visitor's contact details submitted for a link.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::enrichment::{ClientInfo, GeoData};

/// A stored lead. At most one exists per `(link_id, email)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadCapture {
    pub id: Uuid,
    pub link_id: Uuid,
    /// Trimmed and lower-cased.
    pub email: String,
    pub name: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub client_address: Option<String>,
    pub geo: GeoData,
    pub client: ClientInfo,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLeadCapture {
    pub link_id: Uuid,
    pub email: String,
    pub name: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub client_address: Option<String>,
    pub geo: GeoData,
    pub client: ClientInfo,
    pub captured_at: DateTime<Utc>,
}

impl NewLeadCapture {
    pub fn into_capture(self, id: Uuid) -> LeadCapture {
        LeadCapture {
            id,
            link_id: self.link_id,
            email: self.email,
            name: self.name,
            user_agent: self.user_agent,
            referrer: self.referrer,
            client_address: self.client_address,
            geo: self.geo,
            client: self.client,
            captured_at: self.captured_at,
        }
    }
}

/// A lead joined with the link it was captured for.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerLeadCapture {
    pub capture: LeadCapture,
    pub link_title: Option<String>,
    pub short_code: String,
    pub destination_url: String,
}

/// Result of a lead submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadOutcome {
    pub accepted: bool,
    pub duplicate: bool,
}

impl LeadOutcome {
    pub fn created() -> Self {
        Self {
            accepted: true,
            duplicate: false,
        }
    }

    pub fn duplicate() -> Self {
        Self {
            accepted: true,
            duplicate: true,
        }
    }
}

/// Outcome of a storage-level insert attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LeadInsert {
    Created(LeadCapture),
    /// The `(link_id, email)` pair already exists.
    Duplicate,
}
