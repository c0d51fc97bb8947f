//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

fn config<K: KeyExtractor>(
    extractor: K,
    per_second: u64,
    burst: u32,
) -> Arc<GovernorConfig<K, NoOpMiddleware<QuantaInstant>>> {
    Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(extractor)
            .per_second(per_second)
            .burst_size(burst)
            .finish()
            .expect("valid rate limit configuration"),
    )
}

/// Applies the public rate limit tier to a router.
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
/// Per client IP. With `behind_proxy` the IP comes from `X-Forwarded-For` /
/// `X-Real-IP` headers; otherwise from the socket peer address. Enable proxy
/// mode only behind a trusted reverse proxy, since the headers are spoofable.
pub fn public(router: Router<AppState>, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        router.layer(GovernorLayer::new(config(SmartIpKeyExtractor, 2, 100)))
    } else {
        router.layer(GovernorLayer::new(config(PeerIpKeyExtractor, 2, 100)))
    }
}

/// Applies the stricter tier used for authenticated and admin endpoints.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
pub fn strict(router: Router<AppState>, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        router.layer(GovernorLayer::new(config(SmartIpKeyExtractor, 1, 10)))
    } else {
        router.layer(GovernorLayer::new(config(PeerIpKeyExtractor, 1, 10)))
    }
}
