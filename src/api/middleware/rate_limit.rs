//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

const PER_SECOND: u64 = 2;
const BURST_SIZE: u32 = 100;

pub type PublicLimit<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter for public endpoints.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/{code}", get(redirect_json_handler))
///     .layer(rate_limit::layer());
/// ```
pub fn layer() -> PublicLimit<PeerIpKeyExtractor> {
    with_key(PeerIpKeyExtractor)
}

/// Same limits as [`layer`], keyed on the forwarded client address.
///
/// Reads `X-Forwarded-For`, `X-Real-IP` and `Forwarded` before falling back
/// to the peer address. Only install behind a trusted reverse proxy.
pub fn proxied_layer() -> PublicLimit<SmartIpKeyExtractor> {
    with_key(SmartIpKeyExtractor)
}

fn with_key<K: KeyExtractor>(key_extractor: K) -> PublicLimit<K> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(PER_SECOND)
            .burst_size(BURST_SIZE)
            .key_extractor(key_extractor)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}
