//! Builder for composing a requester with middleware layers.
//!
//! # Layer order
//!
//! Layers form an onion around the raw requester:
//!
//! ```text
//! Resource core
//!     ↓
//! Outermost layer (e.g. cache: answers repeated calls without going further)
//!     ↓
//! Inner layer (e.g. error limit: rejects calls once the budget is spent)
//!     ↓
//! Raw requester (transport)
//! ```
//!
//! `layers` is stored outermost-first: the last layer added becomes the
//! outermost. `build()` applies them in reverse to construct the nesting.
//!
//! ```text
//! builder.with_error_limit(..).with_cache(..)
//!
//! Storage: [Cache, ErrorLimit]
//! Result:  Cache(ErrorLimit(Raw))
//! ```

use std::sync::Arc;

use esi_core::{Middleware, Requester};
use esi_types::{CacheConfig, ErrorLimitConfig};
use serde_json::json;

use crate::cache::CacheMiddleware;
use crate::error_limit::ErrorLimitMiddleware;

const CACHE: &str = "CachingRequester";
const ERROR_LIMIT: &str = "ErrorLimitRequester";

/// Middleware builder for composing a requester with layered wrappers.
///
/// See [module-level documentation](self) for details on layer ordering.
pub struct RequesterBuilder {
    raw: Arc<dyn Requester>,
    /// Middleware layers in outermost-first order.
    layers: Vec<Box<dyn Middleware>>,
}

impl RequesterBuilder {
    /// Create a new builder from a raw, unwrapped requester.
    #[must_use]
    pub fn new(raw: Arc<dyn Requester>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add or replace the response cache, as the outermost layer.
    #[must_use]
    pub fn with_cache(mut self, cfg: &CacheConfig) -> Self {
        self.layers.retain(|m| m.name() != CACHE);
        self.layers
            .insert(0, Box::new(CacheMiddleware::new(cfg.clone())));
        self
    }

    /// Remove the response cache if present.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.layers.retain(|m| m.name() != CACHE);
        self
    }

    /// Add or replace the error-limit guard, as the outermost layer.
    #[must_use]
    pub fn with_error_limit(mut self, cfg: &ErrorLimitConfig) -> Self {
        self.layers.retain(|m| m.name() != ERROR_LIMIT);
        self.layers
            .insert(0, Box::new(ErrorLimitMiddleware::new(cfg.clone())));
        self
    }

    /// Remove the error-limit guard if present.
    #[must_use]
    pub fn without_error_limit(mut self) -> Self {
        self.layers.retain(|m| m.name() != ERROR_LIMIT);
        self
    }

    /// Add an arbitrary middleware layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Names of the configured layers, outermost first.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|m| m.name()).collect()
    }

    /// Describe the stack for logs and inspection, outermost first, with
    /// the raw requester last.
    #[must_use]
    pub fn describe(&self) -> serde_json::Value {
        let mut out: Vec<serde_json::Value> = self
            .layers
            .iter()
            .map(|m| json!({ "name": m.name(), "config": m.config_json() }))
            .collect();
        out.push(json!({ "name": "RawRequester", "config": { "name": self.raw.name() } }));
        serde_json::Value::Array(out)
    }

    /// Build the wrapped requester.
    ///
    /// With `layers = [Cache, ErrorLimit]`:
    /// ```text
    /// 1. Start:            acc = Raw
    /// 2. Apply ErrorLimit: acc = ErrorLimit(Raw)
    /// 3. Apply Cache:      acc = Cache(ErrorLimit(Raw))
    /// ```
    #[must_use]
    pub fn build(self) -> Arc<dyn Requester> {
        let mut acc: Arc<dyn Requester> = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            acc = m.apply(acc);
        }
        acc
    }
}
