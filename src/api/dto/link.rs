//! DTOs for link creation and lookup.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

use crate::application::services::CreateLinkOptions;
use crate::domain::entities::Link;

/// Compiled regex for custom alias validation.
static CUSTOM_ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

/// Request to create a short link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Destination URL (absolute http/https).
    #[validate(length(min = 1, max = 2048, message = "URL is required"))]
    pub url: String,

    #[validate(length(min = 3, max = 32, message = "Custom alias must be 3-32 characters"))]
    #[validate(regex(
        path = "*CUSTOM_ALIAS_REGEX",
        message = "Custom alias can only contain letters and digits"
    ))]
    pub custom_alias: Option<String>,

    #[validate(length(max = 255))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// After this instant the link answers 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub lead_capture_enabled: bool,
}

impl CreateLinkRequest {
    pub fn options(&self) -> CreateLinkOptions {
        CreateLinkOptions {
            custom_alias: self.custom_alias.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            expires_at: self.expires_at,
            lead_capture_enabled: self.lead_capture_enabled,
        }
    }
}

/// Full link representation returned to the owner.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: Uuid,
    pub short_code: String,
    pub short_url: String,
    pub destination_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub lead_capture_enabled: bool,
    pub total_clicks: i64,
    pub unique_clicks: i64,
    pub lead_captures: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            short_code: link.short_code,
            short_url,
            destination_url: link.destination_url,
            custom_alias: link.custom_alias,
            title: link.title,
            description: link.description,
            is_active: link.is_active,
            expires_at: link.expires_at,
            lead_capture_enabled: link.lead_capture_enabled,
            total_clicks: link.total_clicks,
            unique_clicks: link.unique_clicks,
            lead_captures: link.lead_captures,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Public view of a link for the lead capture page.
///
/// Carries no counters or owner information.
#[derive(Debug, Serialize)]
pub struct CaptureLinkResponse {
    pub id: Uuid,
    pub short_code: String,
    pub destination_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub lead_capture_enabled: bool,
}

impl From<Link> for CaptureLinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            short_code: link.short_code,
            destination_url: link.destination_url,
            title: link.title,
            description: link.description,
            lead_capture_enabled: link.lead_capture_enabled,
        }
    }
}
