//! Best-effort enrichment of click and lead records.
//!
//! - [`device`] - pure user-agent classification
//! - [`geo`] - geographic lookup contract and address pre-checks

pub mod device;
pub mod geo;

pub use device::{Browser, ClientInfo, DeviceClass, Os, classify_client};
pub use geo::{
    AbsorbReason, Absorbed, GeoData, GeoLocator, GeoLookup, is_local_address, precheck, settle,
};

#[cfg(test)]
pub use geo::MockGeoLocator;
