//! esi-middleware
//!
//! Wrappers around a [`Requester`](esi_core::Requester), composed with
//! [`RequesterBuilder`].

mod builder;
mod cache;
mod error_limit;

pub use crate::builder::RequesterBuilder;
pub use crate::cache::{CacheMiddleware, CachingRequester};
pub use crate::error_limit::{ErrorLimitMiddleware, ErrorLimitRequester};
