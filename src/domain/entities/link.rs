//! Link entity representing a short code mapped to a destination URL.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A shortened link with metadata and rolling counters.
///
/// Counters are maintained incrementally by the storage layer and never
/// recomputed from click history on read.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Link {
    pub id: Uuid,
    pub owner_id: String,
    pub short_code: String,
    pub destination_url: String,
    pub custom_alias: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub lead_capture_enabled: bool,
    pub total_clicks: i64,
    pub unique_clicks: i64,
    pub lead_captures: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if the link has an expiry at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Full short URL under the given public base.
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.short_code)
    }
}

/// Input data for persisting a new link.
///
/// Counters start at zero and `is_active` at true; the repository assigns
/// the id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub owner_id: String,
    pub short_code: String,
    pub destination_url: String,
    pub custom_alias: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub lead_capture_enabled: bool,
}

#[cfg(test)]
pub(crate) fn sample_link(code: &str) -> Link {
    let now = Utc::now();
    Link {
        id: Uuid::new_v4(),
        owner_id: "user-1".to_string(),
        short_code: code.to_string(),
        destination_url: "https://example.com".to_string(),
        custom_alias: None,
        title: None,
        description: None,
        is_active: true,
        expires_at: None,
        lead_capture_enabled: false,
        total_clicks: 0,
        unique_clicks: 0,
        lead_captures: 0,
        created_at: now,
        updated_at: now,
    }
}
