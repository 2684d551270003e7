//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Limit tiers applied to route groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Reads and worker callbacks: one token every 2 seconds, burst 100.
    Standard,
    /// Generation and submission: one token per second, burst 10.
    ///
    /// Each call fans out to the configuration service or the queue.
    Strict,
}

impl Tier {
    fn per_second(self) -> u64 {
        match self {
            Tier::Standard => 2,
            Tier::Strict => 1,
        }
    }

    fn burst_size(self) -> u32 {
        match self {
            Tier::Standard => 100,
            Tier::Strict => 10,
        }
    }
}

/// Applies the rate limiter for `tier` to `router`.
///
/// # Key Extraction
///
/// Limits are applied per client IP. With `behind_proxy` the IP is read from
/// `X-Forwarded-For` / `X-Real-IP` / `Forwarded`, otherwise from the socket
/// peer address. Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Example
///
/// ```rust,ignore
/// let api = rate_limit::apply(api::routes::command_routes(), Tier::Strict, false);
/// ```
pub fn apply(router: Router<AppState>, tier: Tier, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        router.layer(proxied_layer(tier))
    } else {
        router.layer(peer_layer(tier))
    }
}

/// Limiter keyed by the socket peer address.
pub fn peer_layer(
    tier: Tier,
) -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(tier.per_second())
            .burst_size(tier.burst_size())
            .finish()
            .expect("rate limit tiers use non-zero values"),
    );

    GovernorLayer::new(governor_conf)
}

/// Limiter keyed by the client IP reported by a trusted reverse proxy.
pub fn proxied_layer(
    tier: Tier,
) -> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(tier.per_second())
            .burst_size(tier.burst_size())
            .finish()
            .expect("rate limit tiers use non-zero values"),
    );

    GovernorLayer::new(governor_conf)
}
