//! HTTP geo-IP provider speaking the ipapi.co JSON shape.

use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::domain::enrichment::{
    AbsorbReason, Absorbed, GeoData, GeoLocator, GeoLookup, precheck,
};

const CACHE_MAX_CAPACITY: u64 = 10_000;

/// Default lookup endpoint; `{ip}` is replaced with the client address.
pub const DEFAULT_API_URL: &str = "https://ipapi.co/{ip}/json/";

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    country_name: Option<String>,
    region: Option<String>,
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
}

impl From<IpApiResponse> for GeoData {
    fn from(r: IpApiResponse) -> Self {
        let fallback = GeoData::unknown();
        GeoData {
            country: non_empty(r.country_name).or(fallback.country),
            region: non_empty(r.region).or(fallback.region),
            city: non_empty(r.city).or(fallback.city),
            latitude: r.latitude,
            longitude: r.longitude,
            timezone: non_empty(r.timezone),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Geo-IP lookups over HTTP with a hard per-request timeout.
///
/// Successful results are cached per address for the configured TTL.
/// Failures are not cached and are never retried.
pub struct IpApiLocator {
    client: reqwest::Client,
    url_template: String,
    cache: Cache<IpAddr, GeoData>,
}

impl IpApiLocator {
    /// Builds a locator for `url_template`, which must contain `{ip}`.
    pub fn new(
        url_template: impl Into<String>,
        timeout: Duration,
        cache_ttl: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .time_to_live(cache_ttl)
            .max_capacity(CACHE_MAX_CAPACITY)
            .build();

        Ok(Self {
            client,
            url_template: url_template.into(),
            cache,
        })
    }

    async fn fetch(&self, ip: IpAddr) -> GeoLookup {
        let url = self.url_template.replace("{ip}", &ip.to_string());

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                Absorbed::new(AbsorbReason::Timeout)
            } else {
                Absorbed::new(AbsorbReason::Transport(e.to_string()))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Absorbed::new(AbsorbReason::Status(status.as_u16())));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                Absorbed::new(AbsorbReason::Timeout)
            } else {
                Absorbed::new(AbsorbReason::Transport(e.to_string()))
            }
        })?;

        let parsed: IpApiResponse = serde_json::from_str(&body)
            .map_err(|e| Absorbed::new(AbsorbReason::Malformed(e.to_string())))?;

        if parsed.error {
            let reason = parsed.reason.unwrap_or_else(|| "unspecified".to_string());
            return Err(Absorbed::new(AbsorbReason::Rejected(reason)));
        }

        // A body without a country resolved nothing; keep it out of the cache.
        if non_empty(parsed.country_name.clone()).is_none() {
            return Err(Absorbed::new(AbsorbReason::Malformed(
                "response carries no location".to_string(),
            )));
        }

        Ok(parsed.into())
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    async fn locate(&self, client_address: &str) -> GeoLookup {
        let ip = match precheck(client_address) {
            Ok(ip) => ip,
            Err(settled) => return settled,
        };

        if let Some(hit) = self.cache.get(&ip).await {
            trace!(%ip, "Geo-IP cache hit");
            return Ok(hit);
        }

        match self.fetch(ip).await {
            Ok(geo) => {
                self.cache.insert(ip, geo.clone()).await;
                debug!(%ip, country = geo.country.as_deref().unwrap_or("-"), "Geo-IP lookup");
                Ok(geo)
            }
            Err(absorbed) => {
                record_absorbed(&absorbed, client_address);
                Err(absorbed)
            }
        }
    }
}

fn record_absorbed(absorbed: &Absorbed, client_address: &str) {
    if absorbed.reason.is_fault() {
        warn!(address = client_address, reason = %absorbed.reason, "Geo-IP lookup failed");
    } else {
        debug!(address = client_address, reason = %absorbed.reason, "Geo-IP lookup skipped");
    }
    metrics::counter!("geoip_lookups_absorbed_total", "reason" => absorbed.reason.kind())
        .increment(1);
}
