use async_trait::async_trait;

use crate::domain::enrichment::{AbsorbReason, Absorbed, GeoLocator, GeoLookup, precheck};

/// Locator installed when `GEOIP_ENABLED=false`.
///
/// Local addresses still resolve to the `Local` sentinel; everything else is
/// absorbed as `Unknown` without I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLocator;

#[async_trait]
impl GeoLocator for DisabledLocator {
    async fn locate(&self, client_address: &str) -> GeoLookup {
        match precheck(client_address) {
            Ok(_) => Err(Absorbed::new(AbsorbReason::Disabled)),
            Err(settled) => settled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrichment::{GeoData, settle};

    #[tokio::test]
    async fn test_disabled_locator() {
        let locator = DisabledLocator;

        assert_eq!(locator.locate("10.0.0.1").await, Ok(GeoData::local()));
        assert_eq!(settle(locator.locate("8.8.8.8").await), GeoData::unknown());

        let absorbed = locator.locate("8.8.8.8").await.unwrap_err();
        assert_eq!(absorbed.reason, AbsorbReason::Disabled);
    }
}
