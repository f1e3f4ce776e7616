//! Read-side aggregation over a link's click history.
//!
//! [`summarize`] is a single O(n) scan with no I/O. It is recomputed on every
//! analytics request; there is no materialized rollup.

use chrono::Local;
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

use crate::domain::entities::Click;
use crate::utils::referrer::referrer_domain;

/// Referrer groups kept in the summary.
pub const TOP_REFERRERS: usize = 10;
/// Clicks kept in the recent-clicks view.
pub const RECENT_CLICKS: usize = 10;

const UNKNOWN_COUNTRY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferrerCount {
    pub domain: String,
    pub count: u64,
}

/// Aggregated view of all clicks recorded for one link.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSummary {
    pub link_id: Uuid,
    pub total_clicks: u64,
    /// Distinct client addresses over the full history.
    pub unique_clicks: u64,
    pub bot_clicks: u64,
    pub clicks_by_country: BTreeMap<String, u64>,
    pub clicks_by_device: BTreeMap<String, u64>,
    pub clicks_by_browser: BTreeMap<String, u64>,
    pub clicks_by_os: BTreeMap<String, u64>,
    /// Keyed by `YYYY-MM-DD` in the server's local time zone.
    pub clicks_by_day: BTreeMap<String, u64>,
    pub top_referrers: Vec<ReferrerCount>,
    /// Newest first.
    pub recent_clicks: Vec<Click>,
}

impl AnalyticsSummary {
    pub fn empty(link_id: Uuid) -> Self {
        summarize(link_id, Vec::new())
    }
}

/// Groups a link's clicks by country, device, browser, OS, and local day.
///
/// Clicks are processed in ascending timestamp order, so referrer ties keep
/// the order in which each domain was first seen.
pub fn summarize(link_id: Uuid, mut clicks: Vec<Click>) -> AnalyticsSummary {
    clicks.sort_by_key(|c| c.clicked_at);

    let mut addresses: HashSet<&str> = HashSet::new();
    let mut by_country = BTreeMap::new();
    let mut by_device = BTreeMap::new();
    let mut by_browser = BTreeMap::new();
    let mut by_os = BTreeMap::new();
    let mut by_day = BTreeMap::new();
    let mut referrer_index: HashMap<String, usize> = HashMap::new();
    let mut referrers: Vec<ReferrerCount> = Vec::new();
    let mut bot_clicks = 0;

    for click in &clicks {
        addresses.insert(click.client_address.as_str());

        if click.client.is_bot {
            bot_clicks += 1;
        }

        let country = click
            .geo
            .country
            .clone()
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());
        *by_country.entry(country).or_insert(0) += 1;
        *by_device
            .entry(click.client.device.as_str().to_string())
            .or_insert(0) += 1;
        *by_browser
            .entry(click.client.browser.as_str().to_string())
            .or_insert(0) += 1;
        *by_os.entry(click.client.os.as_str().to_string()).or_insert(0) += 1;

        let day = click
            .clicked_at
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string();
        *by_day.entry(day).or_insert(0) += 1;

        let domain = referrer_domain(click.referrer.as_deref());
        match referrer_index.get(&domain) {
            Some(&i) => referrers[i].count += 1,
            None => {
                referrer_index.insert(domain.clone(), referrers.len());
                referrers.push(ReferrerCount { domain, count: 1 });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    referrers.sort_by(|a, b| b.count.cmp(&a.count));
    referrers.truncate(TOP_REFERRERS);

    let total_clicks = clicks.len() as u64;
    let unique_clicks = addresses.len() as u64;

    let recent_clicks: Vec<Click> = clicks.iter().rev().take(RECENT_CLICKS).cloned().collect();

    AnalyticsSummary {
        link_id,
        total_clicks,
        unique_clicks,
        bot_clicks,
        clicks_by_country: by_country,
        clicks_by_device: by_device,
        clicks_by_browser: by_browser,
        clicks_by_os: by_os,
        clicks_by_day: by_day,
        top_referrers: referrers,
        recent_clicks,
    }
}
