//! DTOs for the per-link analytics endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::analytics::{AnalyticsSummary, ReferrerCount};
use crate::domain::entities::Click;

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub link_id: Uuid,
    pub total_clicks: u64,
    pub unique_clicks: u64,
    pub bot_clicks: u64,
    pub clicks_by_country: BTreeMap<String, u64>,
    pub clicks_by_device: BTreeMap<String, u64>,
    pub clicks_by_browser: BTreeMap<String, u64>,
    pub clicks_by_os: BTreeMap<String, u64>,
    pub clicks_by_day: BTreeMap<String, u64>,
    pub top_referrers: Vec<ReferrerItem>,
    pub recent_clicks: Vec<RecentClick>,
}

#[derive(Debug, Serialize)]
pub struct ReferrerItem {
    pub domain: String,
    pub count: u64,
}

/// Click detail shown in the recent-clicks list. Omits the raw address.
#[derive(Debug, Serialize)]
pub struct RecentClick {
    pub id: Uuid,
    pub clicked_at: DateTime<Utc>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub device_type: &'static str,
    pub browser: &'static str,
    pub os: &'static str,
    pub referrer: Option<String>,
    pub is_unique: bool,
    pub is_bot: bool,
}

impl From<ReferrerCount> for ReferrerItem {
    fn from(r: ReferrerCount) -> Self {
        Self {
            domain: r.domain,
            count: r.count,
        }
    }
}

impl From<Click> for RecentClick {
    fn from(c: Click) -> Self {
        Self {
            id: c.id,
            clicked_at: c.clicked_at,
            country: c.geo.country,
            city: c.geo.city,
            device_type: c.client.device.as_str(),
            browser: c.client.browser.as_str(),
            os: c.client.os.as_str(),
            referrer: c.referrer,
            is_unique: c.is_unique,
            is_bot: c.client.is_bot,
        }
    }
}

impl From<AnalyticsSummary> for AnalyticsResponse {
    fn from(s: AnalyticsSummary) -> Self {
        Self {
            link_id: s.link_id,
            total_clicks: s.total_clicks,
            unique_clicks: s.unique_clicks,
            bot_clicks: s.bot_clicks,
            clicks_by_country: s.clicks_by_country,
            clicks_by_device: s.clicks_by_device,
            clicks_by_browser: s.clicks_by_browser,
            clicks_by_os: s.clicks_by_os,
            clicks_by_day: s.clicks_by_day,
            top_referrers: s.top_referrers.into_iter().map(Into::into).collect(),
            recent_clicks: s.recent_clicks.into_iter().map(Into::into).collect(),
        }
    }
}
