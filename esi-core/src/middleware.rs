//! Middleware trait for wrapping `Requester` implementations.

use std::sync::Arc;

use crate::requester::Requester;

/// Trait implemented by requester middleware layers.
///
/// A middleware consumes an inner `Requester` and returns a wrapped requester
/// that augments or restricts behavior (e.g., response caching, error limits).
pub trait Middleware: Send + Sync {
    /// Apply this middleware to wrap an inner requester and return the wrapped requester.
    fn apply(self: Box<Self>, inner: Arc<dyn Requester>) -> Arc<dyn Requester>;

    /// Human-readable middleware name for introspection/logging.
    fn name(&self) -> &'static str;

    /// Opaque configuration snapshot for serialization/inspection.
    fn config_json(&self) -> serde_json::Value;
}
