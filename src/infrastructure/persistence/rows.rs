//! Row shapes shared by the PostgreSQL repositories.
//!
//! Enrichment enums are stored as their display labels and parsed back
//! leniently, so a label written by a newer build never fails a read.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::enrichment::{Browser, ClientInfo, DeviceClass, GeoData, Os};
use crate::domain::entities::{Click, LeadCapture, OwnerLeadCapture};

/// Column list for `clicks`, in the order [`ClickRow`] expects.
pub const CLICK_COLUMNS: &str = "id, link_id, client_address, user_agent, referrer, \
     country, region, city, latitude, longitude, timezone, \
     device_type, browser, os, is_mobile, is_bot, session_id, is_unique, clicked_at";

/// Column list for `lead_captures`, in the order [`LeadRow`] expects.
pub const LEAD_COLUMNS: &str = "id, link_id, email, name, user_agent, referrer, client_address, \
     country, region, city, latitude, longitude, timezone, \
     device_type, browser, os, is_mobile, is_bot, captured_at";

#[derive(Debug, sqlx::FromRow)]
pub struct EnrichmentColumns {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub device_type: String,
    pub browser: String,
    pub os: String,
    pub is_mobile: bool,
    pub is_bot: bool,
}

impl EnrichmentColumns {
    fn split(self) -> (GeoData, ClientInfo) {
        let geo = GeoData {
            country: self.country,
            region: self.region,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: self.timezone,
        };
        let client = ClientInfo {
            device: DeviceClass::from_label(&self.device_type),
            browser: Browser::from_label(&self.browser),
            os: Os::from_label(&self.os),
            is_mobile: self.is_mobile,
            is_bot: self.is_bot,
        };
        (geo, client)
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ClickRow {
    pub id: Uuid,
    pub link_id: Uuid,
    pub client_address: String,
    pub user_agent: String,
    pub referrer: Option<String>,
    #[sqlx(flatten)]
    pub enrichment: EnrichmentColumns,
    pub session_id: Option<String>,
    pub is_unique: bool,
    pub clicked_at: DateTime<Utc>,
}

impl From<ClickRow> for Click {
    fn from(row: ClickRow) -> Self {
        let (geo, client) = row.enrichment.split();
        Click {
            id: row.id,
            link_id: row.link_id,
            client_address: row.client_address,
            user_agent: row.user_agent,
            referrer: row.referrer,
            geo,
            client,
            session_id: row.session_id,
            is_unique: row.is_unique,
            clicked_at: row.clicked_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub link_id: Uuid,
    pub email: String,
    pub name: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub client_address: Option<String>,
    #[sqlx(flatten)]
    pub enrichment: EnrichmentColumns,
    pub captured_at: DateTime<Utc>,
}

impl From<LeadRow> for LeadCapture {
    fn from(row: LeadRow) -> Self {
        let (geo, client) = row.enrichment.split();
        LeadCapture {
            id: row.id,
            link_id: row.link_id,
            email: row.email,
            name: row.name,
            user_agent: row.user_agent,
            referrer: row.referrer,
            client_address: row.client_address,
            geo,
            client,
            captured_at: row.captured_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct OwnerLeadRow {
    #[sqlx(flatten)]
    pub lead: LeadRow,
    pub link_title: Option<String>,
    pub short_code: String,
    pub destination_url: String,
}

impl From<OwnerLeadRow> for OwnerLeadCapture {
    fn from(row: OwnerLeadRow) -> Self {
        OwnerLeadCapture {
            capture: row.lead.into(),
            link_title: row.link_title,
            short_code: row.short_code,
            destination_url: row.destination_url,
        }
    }
}
