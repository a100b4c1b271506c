//! Error-budget guard.
//!
//! The remote service blocks clients that produce too many failed requests
//! in a short window. This wrapper counts failures in a fixed window and,
//! once the budget is spent, rejects calls locally with
//! [`EsiError::ErrorLimited`] until the window rolls over. Missing records
//! (`NotFound`) are ordinary answers and do not count.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use esi_core::{Middleware, Requester};
use esi_types::{AuthToken, ErrorLimitConfig, ErrorLimitState, EsiError, RequestParams, RouteId};
use serde_json::Value;

/// Wrapper that enforces an error budget.
pub struct ErrorLimitRequester {
    inner: Arc<dyn Requester>,
    runtime: Mutex<ErrorWindow>,
}

struct ErrorWindow {
    limit: u64,
    window: Duration,
    errors_in_window: u64,
    window_start: Instant,
}

impl ErrorWindow {
    fn roll(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.window_start);
        if elapsed >= self.window {
            self.errors_in_window = 0;
            // Keep windows aligned to regular boundaries even after idle gaps.
            let windows_passed = elapsed.as_nanos() / self.window.as_nanos();
            let boundary_offset = Duration::from_nanos(
                (windows_passed * self.window.as_nanos())
                    .try_into()
                    .unwrap_or(u64::MAX),
            );
            self.window_start += boundary_offset;
        }
    }

    fn reset_in(&self, now: Instant) -> Duration {
        self.window
            .saturating_sub(now.duration_since(self.window_start))
    }
}

fn millis(d: Duration) -> u64 {
    d.as_millis().try_into().unwrap_or(u64::MAX)
}

impl ErrorLimitRequester {
    /// Create a new error-limited wrapper around an existing requester.
    ///
    /// A zero window is treated as one millisecond.
    pub fn new(inner: Arc<dyn Requester>, config: &ErrorLimitConfig) -> Self {
        Self {
            inner,
            runtime: Mutex::new(ErrorWindow {
                limit: config.limit,
                window: config.window.max(Duration::from_millis(1)),
                errors_in_window: 0,
                window_start: Instant::now(),
            }),
        }
    }

    /// Access the inner requester.
    pub fn inner(&self) -> &Arc<dyn Requester> {
        &self.inner
    }

    /// Current budget snapshot.
    pub fn state(&self) -> ErrorLimitState {
        let mut rt = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        rt.roll(now);
        ErrorLimitState {
            limit: rt.limit,
            remaining: rt.limit.saturating_sub(rt.errors_in_window),
            reset_in: rt.reset_in(now),
        }
    }

    /// Check whether a call may be issued in the current window.
    ///
    /// # Errors
    /// Returns `EsiError::ErrorLimited` when the window's budget is spent.
    pub fn should_allow_call(&self) -> Result<(), EsiError> {
        let mut rt = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        rt.roll(now);
        if rt.errors_in_window < rt.limit {
            return Ok(());
        }
        let err = EsiError::ErrorLimited {
            remaining: 0,
            reset_in_ms: millis(rt.reset_in(now)),
        };
        drop(rt);
        Err(err)
    }

    fn record_error(&self) {
        let mut rt = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        rt.roll(Instant::now());
        rt.errors_in_window = rt.errors_in_window.saturating_add(1);
        #[cfg(feature = "tracing")]
        if rt.errors_in_window == rt.limit {
            tracing::warn!(limit = rt.limit, "error budget exhausted; rejecting calls until the window resets");
        }
        drop(rt);
    }

    const fn counts_against_budget(err: &EsiError) -> bool {
        matches!(err, EsiError::Request { .. } | EsiError::Other(_))
    }
}

/// Middleware config for constructing an [`ErrorLimitRequester`].
pub struct ErrorLimitMiddleware {
    pub config: ErrorLimitConfig,
}

impl ErrorLimitMiddleware {
    #[must_use]
    pub const fn new(config: ErrorLimitConfig) -> Self {
        Self { config }
    }
}

impl Middleware for ErrorLimitMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn Requester>) -> Arc<dyn Requester> {
        Arc::new(ErrorLimitRequester::new(inner, &self.config))
    }

    fn name(&self) -> &'static str {
        "ErrorLimitRequester"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "limit": self.config.limit,
            "window_ms": millis(self.config.window),
        })
    }
}

#[async_trait]
impl Requester for ErrorLimitRequester {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn request(
        &self,
        route: RouteId,
        params: RequestParams,
        token: Option<&AuthToken>,
    ) -> Result<Value, EsiError> {
        self.should_allow_call()?;
        let res = self.inner.request(route, params, token).await;
        if let Err(e) = &res
            && Self::counts_against_budget(e)
        {
            self.record_error();
        }
        res
    }
}
