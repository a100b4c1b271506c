//! Configuration types shared across the client facade and middleware.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global configuration for the `Esi` client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsiConfig {
    /// Maximum number of batch groups in flight at once.
    ///
    /// Groups of a single bulk lookup are independent; this bounds how many of
    /// them are dispatched concurrently. Must be at least 1.
    pub batch_concurrency: usize,
    /// Optional per-request deadline applied around each collaborator call.
    pub request_timeout: Option<Duration>,
}

impl Default for EsiConfig {
    fn default() -> Self {
        Self {
            batch_concurrency: 8,
            request_timeout: None,
        }
    }
}

/// Configuration for the response cache middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied to routes without an explicit entry. Zero disables caching.
    pub default_ttl_ms: u64,
    /// Maximum number of cached responses across all routes.
    pub max_entries: u64,
    /// Per-route TTL overrides keyed by route id. Zero disables caching for that route.
    pub per_route_ttl_ms: HashMap<String, u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: 300_000,
            max_entries: 10_000,
            per_route_ttl_ms: HashMap::new(),
        }
    }
}

impl CacheConfig {
    /// Effective TTL for a route, or `None` when caching is disabled for it.
    #[must_use]
    pub fn ttl_for(&self, route: &str) -> Option<Duration> {
        let ms = self
            .per_route_ttl_ms
            .get(route)
            .copied()
            .unwrap_or(self.default_ttl_ms);
        (ms > 0).then(|| Duration::from_millis(ms))
    }
}

/// Configuration for the error-limit guard.
///
/// The remote service bans clients that produce too many errors in a short
/// window; the guard stops issuing requests once the local budget is spent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorLimitConfig {
    /// Maximum number of failed requests tolerated within a single window.
    pub limit: u64,
    /// Duration of the accounting window.
    pub window: Duration,
}

impl Default for ErrorLimitConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            window: Duration::from_secs(60),
        }
    }
}

/// Snapshot of the error budget at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorLimitState {
    /// Configured maximum errors per window.
    pub limit: u64,
    /// Remaining errors tolerated in the current window.
    pub remaining: u64,
    /// Time remaining until the current window resets.
    pub reset_in: Duration,
}
