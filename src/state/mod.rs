//! Shared state used across concurrent fetches and batch subjects
//!
//! # Components
//!
//! - `RateLimiter`: per-host minimum interval between outbound requests
//! - `EnrichmentCache`: enrichment records keyed by subject
//! - `SharedState`: the pair, handed to every component that talks to the network

mod cache;
mod rate_limiter;

pub use cache::{EnrichmentCache, SubjectKey};
pub use rate_limiter::{RateLimitEntry, RateLimiter};

use std::sync::Arc;
use std::time::Duration;

/// Rate limiter and cache bundle, cheap to clone
#[derive(Debug, Clone)]
pub struct SharedState {
    pub rate_limiter: Arc<RateLimiter>,
    pub cache: Arc<EnrichmentCache>,
}

impl SharedState {
    pub fn new(rate_limit_interval: Duration) -> Self {
        Self {
            rate_limiter: Arc::new(RateLimiter::new(rate_limit_interval)),
            cache: Arc::new(EnrichmentCache::new()),
        }
    }
}
