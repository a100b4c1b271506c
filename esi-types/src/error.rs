use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the esi workspace.
///
/// Transport failures reported by the request collaborator pass through
/// unchanged as `Request`; the resource layer only adds `NotFound` for
/// lookups that succeeded but did not contain the requested id.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EsiError {
    /// The request collaborator failed to produce a response.
    #[error("{route} failed: {msg}")]
    Request {
        /// Route identifier of the failed call.
        route: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The response did not match the expected shape.
    #[error("could not decode {route}: {msg}")]
    Decode {
        /// Route identifier whose payload failed to decode.
        route: String,
        /// Decoder message.
        msg: String,
    },

    /// A requested record was absent from an otherwise successful response.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing record, e.g. "starbase 1000123".
        what: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An authenticated route was called without an access token.
    #[error("route requires an access token: {route}")]
    Unauthorized {
        /// Route identifier that requires authentication.
        route: String,
    },

    /// A single request exceeded the configured deadline.
    #[error("request timed out: {route}")]
    RequestTimeout {
        /// Route identifier that timed out.
        route: String,
    },

    /// The error budget for the current window is spent; calls fail fast until reset.
    #[error("error limit reached: remaining={remaining} reset_in_ms={reset_in_ms}")]
    ErrorLimited {
        /// Remaining error budget at the time of rejection.
        remaining: u64,
        /// Milliseconds until the error window resets.
        reset_in_ms: u64,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl EsiError {
    /// Helper: build a `Request` error for a route and message.
    pub fn request(route: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Request {
            route: route.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Decode` error for a route and decoder message.
    pub fn decode(route: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            route: route.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing record.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `RequestTimeout` error.
    pub fn request_timeout(route: impl Into<String>) -> Self {
        Self::RequestTimeout {
            route: route.into(),
        }
    }

    /// Helper: build an `Unauthorized` error.
    pub fn unauthorized(route: impl Into<String>) -> Self {
        Self::Unauthorized {
            route: route.into(),
        }
    }

    /// Returns true if this is a `NotFound` condition.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this error should be surfaced to users as actionable.
    ///
    /// A missing record is a benign outcome of a successful lookup; everything
    /// else indicates a failed or rejected call.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !self.is_not_found()
    }

    /// Replace the description of a `NotFound` error, leaving other variants untouched.
    #[must_use]
    pub fn relabel_not_found(self, what: impl Into<String>) -> Self {
        match self {
            Self::NotFound { .. } => Self::not_found(what),
            other => other,
        }
    }
}

impl From<serde_json::Error> for EsiError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode("<json>", err.to_string())
    }
}
