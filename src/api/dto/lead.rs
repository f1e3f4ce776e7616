//! DTOs for lead capture submission and listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::application::services::LeadTarget;
use crate::domain::entities::{LeadCapture, LeadOutcome, OwnerLeadCapture};
use crate::error::AppError;

/// Lead form submission.
///
/// Exactly one of `link_id` or `short_code` identifies the link; `link_id`
/// wins when both are present. Email and name are validated by the service.
#[derive(Debug, Deserialize)]
pub struct SubmitLeadRequest {
    pub link_id: Option<Uuid>,
    pub short_code: Option<String>,
    pub email: String,
    pub name: String,
    /// Client-side capture time.
    pub timestamp: Option<DateTime<Utc>>,
}

impl SubmitLeadRequest {
    pub fn target(&self) -> Result<LeadTarget, AppError> {
        if let Some(id) = self.link_id {
            return Ok(LeadTarget::LinkId(id));
        }

        match self.short_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Ok(LeadTarget::ShortCode(code.to_string())),
            _ => Err(AppError::bad_request(
                "Either link_id or short_code is required",
                json!({ "fields": ["link_id", "short_code"] }),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitLeadResponse {
    pub success: bool,
    pub duplicate: bool,
    pub message: &'static str,
}

impl From<LeadOutcome> for SubmitLeadResponse {
    fn from(outcome: LeadOutcome) -> Self {
        Self {
            success: outcome.accepted,
            duplicate: outcome.duplicate,
            message: if outcome.duplicate {
                "Lead already captured"
            } else {
                "Lead captured"
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub id: Uuid,
    pub link_id: Uuid,
    pub email: String,
    pub name: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub client_address: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub device_type: &'static str,
    pub browser: &'static str,
    pub os: &'static str,
    pub is_mobile: bool,
    pub is_bot: bool,
    pub captured_at: DateTime<Utc>,
}

impl From<LeadCapture> for LeadResponse {
    fn from(lead: LeadCapture) -> Self {
        Self {
            id: lead.id,
            link_id: lead.link_id,
            email: lead.email,
            name: lead.name,
            user_agent: lead.user_agent,
            referrer: lead.referrer,
            client_address: lead.client_address,
            country: lead.geo.country,
            region: lead.geo.region,
            city: lead.geo.city,
            latitude: lead.geo.latitude,
            longitude: lead.geo.longitude,
            timezone: lead.geo.timezone,
            device_type: lead.client.device.as_str(),
            browser: lead.client.browser.as_str(),
            os: lead.client.os.as_str(),
            is_mobile: lead.client.is_mobile,
            is_bot: lead.client.is_bot,
            captured_at: lead.captured_at,
        }
    }
}

/// A lead joined with the link it was captured for.
#[derive(Debug, Serialize)]
pub struct OwnerLeadResponse {
    #[serde(flatten)]
    pub lead: LeadResponse,
    pub link_title: Option<String>,
    pub short_code: String,
    pub destination_url: String,
}

impl From<OwnerLeadCapture> for OwnerLeadResponse {
    fn from(row: OwnerLeadCapture) -> Self {
        Self {
            lead: row.capture.into(),
            link_title: row.link_title,
            short_code: row.short_code,
            destination_url: row.destination_url,
        }
    }
}
