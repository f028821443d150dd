//! Rate Limiting Middleware using GCRA Algorithm
//!
//! Per-peer-IP limits via tower_governor. Requires the service to be served
//! with `into_make_service_with_connect_info::<SocketAddr>()`.

use axum::Router;
use governor::middleware::StateInformationMiddleware;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tracing::info;

/// Governor config keyed by peer IP, with X-RateLimit-* headers
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Seconds to replenish one request of quota
    pub per_second: u64,
    /// Burst size (max requests that can be made immediately)
    pub burst_size: u32,
}

/// Build a governor config; `None` if either quota value is zero
pub fn create_governor_config(config: &RateLimitConfig) -> Option<Arc<DefaultGovernorConfig>> {
    GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
}

/// Wrap a router in the per-IP rate limiter
pub fn with_rate_limit(router: Router, config: &RateLimitConfig) -> Option<Router> {
    let governor = create_governor_config(config)?;
    info!(
        "Rate limiting enabled: burst {}, one request per {}s",
        config.burst_size, config.per_second
    );
    Some(router.layer(GovernorLayer { config: governor }))
}
