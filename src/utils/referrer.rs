//! Referrer domain extraction for analytics grouping.

use url::Url;

/// Bucket for clicks without a usable referrer.
pub const DIRECT: &str = "Direct";

/// Returns the host of a referrer URL, or `"Direct"` when it is absent,
/// unparseable, or has no host.
pub fn referrer_domain(referrer: Option<&str>) -> String {
    referrer
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .and_then(|r| Url::parse(r).ok())
        .and_then(|u| u.host_str().map(str::to_string))
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| DIRECT.to_string())
}
