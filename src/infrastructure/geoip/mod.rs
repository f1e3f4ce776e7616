//! Geo-IP providers implementing [`crate::domain::enrichment::GeoLocator`].
//!
//! - [`IpApiLocator`] - external HTTP lookup with timeout and TTL cache
//! - [`DisabledLocator`] - absorbs every public address as `Unknown`

mod disabled;
mod ip_api;

pub use disabled::DisabledLocator;
pub use ip_api::{DEFAULT_API_URL, IpApiLocator};
