//! Rate limiter for the CoinGecko API.
//!
//! The free/demo tier allows roughly 30 calls per minute.

use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = GovLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

#[derive(Debug, Clone)]
pub struct RateLimiter {
    limiter: Arc<DirectLimiter>,
}

impl RateLimiter {
    /// Create with the free-tier limit.
    pub fn new() -> Self {
        Self::with_limit(30)
    }

    /// Create with a custom per-minute limit.
    pub fn with_limit(calls_per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(calls_per_minute.max(1)).unwrap());
        Self {
            limiter: Arc::new(GovLimiter::direct(quota)),
        }
    }

    /// Wait until a call slot is available.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a slot without waiting. Returns true if acquired.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
