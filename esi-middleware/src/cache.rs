//! Response cache keyed by route, parameters and token.
//!
//! Only successful responses are stored; a failed request is never cached
//! and is retried on the next call. Each route resolves its own TTL through
//! [`CacheConfig::ttl_for`], and a TTL of zero turns caching off for it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use esi_core::{Middleware, Requester};
use esi_types::{AuthToken, CacheConfig, EsiError, RequestParams, RouteId};
use moka::Expiry;
use moka::future::Cache;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    route: &'static str,
    params: String,
    token: Option<AuthToken>,
}

impl CacheKey {
    fn new(route: RouteId, params: &RequestParams, token: Option<&AuthToken>) -> Option<Self> {
        // Ordered maps serialize deterministically, so equal params give equal keys.
        let params = serde_json::to_string(params).ok()?;
        Some(Self {
            route: route.as_str(),
            params,
            token: token.cloned(),
        })
    }
}

#[derive(Clone)]
struct Entry {
    value: Arc<Value>,
    ttl: Duration,
}

struct RouteTtl;

impl Expiry<CacheKey, Entry> for RouteTtl {
    fn expire_after_create(&self, _key: &CacheKey, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Declarative wrapper that applies caching when building a requester stack.
pub struct CacheMiddleware {
    cfg: CacheConfig,
}

impl CacheMiddleware {
    #[must_use]
    pub const fn new(cfg: CacheConfig) -> Self {
        Self { cfg }
    }
}

impl Middleware for CacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn Requester>) -> Arc<dyn Requester> {
        let Self { cfg } = *self;
        Arc::new(CachingRequester::new(inner, cfg))
    }

    fn name(&self) -> &'static str {
        "CachingRequester"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "default_ttl_ms": self.cfg.default_ttl_ms,
            "max_entries": self.cfg.max_entries,
            "per_route_ttl_ms": self.cfg.per_route_ttl_ms,
        })
    }
}

/// Requester wrapper that serves repeated identical requests from memory.
pub struct CachingRequester {
    inner: Arc<dyn Requester>,
    cfg: CacheConfig,
    store: Cache<CacheKey, Entry>,
}

impl CachingRequester {
    #[must_use]
    pub fn new(inner: Arc<dyn Requester>, cfg: CacheConfig) -> Self {
        let store = Cache::builder()
            .max_capacity(cfg.max_entries.max(1))
            .expire_after(RouteTtl)
            .build();
        Self { inner, cfg, store }
    }

    /// Access the inner requester.
    pub fn inner(&self) -> &Arc<dyn Requester> {
        &self.inner
    }

    /// Drop every cached response.
    pub fn invalidate_all(&self) {
        self.store.invalidate_all();
    }
}

#[async_trait]
impl Requester for CachingRequester {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn request(
        &self,
        route: RouteId,
        params: RequestParams,
        token: Option<&AuthToken>,
    ) -> Result<Value, EsiError> {
        let Some(ttl) = self.cfg.ttl_for(route.as_str()) else {
            return self.inner.request(route, params, token).await;
        };
        let Some(key) = CacheKey::new(route, &params, token) else {
            return self.inner.request(route, params, token).await;
        };

        if let Some(hit) = self.store.get(&key).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(route = %route, "cache hit");
            return Ok(Value::clone(&hit.value));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(route = %route, ttl_ms = ttl.as_millis(), "cache miss");

        let value = self.inner.request(route, params, token).await?;
        self.store
            .insert(
                key,
                Entry {
                    value: Arc::new(value.clone()),
                    ttl,
                },
            )
            .await;
        Ok(value)
    }
}
