//! Shared data transfer types and configuration primitives for the esi workspace.
#![warn(missing_docs)]

mod config;
mod error;
mod route;

pub use config::{CacheConfig, ErrorLimitConfig, ErrorLimitState, EsiConfig};
pub use error::EsiError;
pub use route::{AuthToken, RequestParams, RouteId};

/// Numeric identifier of a remote entity (character, corporation, killmail, ...).
pub type Id = i64;
