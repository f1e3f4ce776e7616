//! Geographic enrichment contract.
//!
//! A lookup returns [`GeoLookup`]: either resolved [`GeoData`] or an
//! [`Absorbed`] failure that already carries the `Unknown` sentinel. Callers
//! settle the result with [`settle`] and never branch on the failure.

use async_trait::async_trait;
use std::fmt;
use std::net::IpAddr;

const LOCAL: &str = "Local";
const UNKNOWN: &str = "Unknown";

/// Location fields derived from a client address. All optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoData {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
}

impl GeoData {
    /// Sentinel for loopback and private-range addresses.
    pub fn local() -> Self {
        Self {
            country: Some(LOCAL.to_string()),
            region: Some(LOCAL.to_string()),
            city: Some(LOCAL.to_string()),
            ..Self::default()
        }
    }

    /// Sentinel for failed or skipped lookups.
    pub fn unknown() -> Self {
        Self {
            country: Some(UNKNOWN.to_string()),
            region: Some(UNKNOWN.to_string()),
            city: Some(UNKNOWN.to_string()),
            ..Self::default()
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.country.as_deref() == Some(UNKNOWN)
    }
}

/// Why a lookup produced no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsorbReason {
    InvalidAddress,
    Disabled,
    Timeout,
    Transport(String),
    Status(u16),
    Malformed(String),
    Rejected(String),
}

impl AbsorbReason {
    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AbsorbReason::InvalidAddress => "invalid_address",
            AbsorbReason::Disabled => "disabled",
            AbsorbReason::Timeout => "timeout",
            AbsorbReason::Transport(_) => "transport",
            AbsorbReason::Status(_) => "status",
            AbsorbReason::Malformed(_) => "malformed",
            AbsorbReason::Rejected(_) => "rejected",
        }
    }

    /// True for provider or network faults, as opposed to lookups that were
    /// skipped on purpose.
    pub fn is_fault(&self) -> bool {
        !matches!(self, AbsorbReason::InvalidAddress | AbsorbReason::Disabled)
    }
}

impl fmt::Display for AbsorbReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsorbReason::InvalidAddress => write!(f, "address is not a valid IP"),
            AbsorbReason::Disabled => write!(f, "geo-IP lookups are disabled"),
            AbsorbReason::Timeout => write!(f, "lookup timed out"),
            AbsorbReason::Transport(e) => write!(f, "transport error: {e}"),
            AbsorbReason::Status(code) => write!(f, "provider returned status {code}"),
            AbsorbReason::Malformed(e) => write!(f, "malformed response: {e}"),
            AbsorbReason::Rejected(e) => write!(f, "provider rejected lookup: {e}"),
        }
    }
}

/// A failed lookup. Always carries the `Unknown` sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Absorbed {
    pub reason: AbsorbReason,
    pub fallback: GeoData,
}

impl Absorbed {
    pub fn new(reason: AbsorbReason) -> Self {
        Self {
            reason,
            fallback: GeoData::unknown(),
        }
    }
}

pub type GeoLookup = Result<GeoData, Absorbed>;

/// Collapses a lookup into the data to persist.
pub fn settle(lookup: GeoLookup) -> GeoData {
    lookup.unwrap_or_else(|absorbed| absorbed.fallback)
}

/// Resolves a client address to a location.
///
/// Implementations must bound their own latency and never panic; every
/// failure is reported as [`Absorbed`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self, client_address: &str) -> GeoLookup;
}

/// Parses a client address, short-circuiting addresses that never reach the
/// provider.
///
/// Returns `Err` with the final lookup result (`Local` data or an absorbed
/// invalid address) and `Ok` with the parsed public address otherwise.
pub fn precheck(client_address: &str) -> Result<IpAddr, GeoLookup> {
    let Ok(ip) = client_address.trim().parse::<IpAddr>() else {
        return Err(Err(Absorbed::new(AbsorbReason::InvalidAddress)));
    };

    if is_local_address(&ip) {
        return Err(Ok(GeoData::local()));
    }

    Ok(ip)
}

/// Loopback, private, link-local, unspecified, and IPv6 unique-local ranges.
pub fn is_local_address(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return is_local_address(&IpAddr::V4(mapped));
            }
            let first = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80
        }
    }
}
