use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use esi_core::{AuthToken, Batcher, EsiConfig, EsiError, RequestParams, Requester, RouteId, decode};

/// Client handle for the remote service.
///
/// Cheap to clone; every clone shares the same requester stack. Domain
/// accessors (`character`, `corporation`, `universe`, ...) borrow a clone
/// into the adapters they build so that lazily consumed sequences can
/// outlive the call that created them.
#[derive(Clone)]
pub struct Esi {
    pub(crate) requester: Arc<dyn Requester>,
    pub(crate) cfg: EsiConfig,
    pub(crate) token: Option<AuthToken>,
}

/// Builder for constructing an [`Esi`] client with custom configuration.
pub struct EsiBuilder {
    requester: Option<Arc<dyn Requester>>,
    cfg: EsiConfig,
    token: Option<AuthToken>,
}

impl Default for EsiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EsiBuilder {
    /// Create a new builder with default configuration and no requester.
    #[must_use]
    pub fn new() -> Self {
        Self {
            requester: None,
            cfg: EsiConfig::default(),
            token: None,
        }
    }

    /// Register the request collaborator, typically a transport wrapped by
    /// [`RequesterBuilder`](esi_middleware::RequesterBuilder).
    ///
    /// Registering again replaces the previous requester.
    #[must_use]
    pub fn with_requester(mut self, requester: Arc<dyn Requester>) -> Self {
        self.requester = Some(requester);
        self
    }

    /// Bound the number of bulk-lookup groups in flight at once.
    #[must_use]
    pub const fn batch_concurrency(mut self, n: usize) -> Self {
        self.cfg.batch_concurrency = n;
        self
    }

    /// Set a deadline applied to every individual request.
    ///
    /// When exceeded, the call fails with `RequestTimeout` for its route. A
    /// page or cursor sequence ends at the step that timed out.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Access token sent with authenticated routes.
    #[must_use]
    pub fn token(mut self, token: AuthToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: EsiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no requester was registered or the batch
    /// concurrency is zero.
    pub fn build(self) -> Result<Esi, EsiError> {
        let Some(requester) = self.requester else {
            return Err(EsiError::InvalidArg(
                "no requester registered; add one via with_requester(...)".to_string(),
            ));
        };
        if self.cfg.batch_concurrency == 0 {
            return Err(EsiError::InvalidArg(
                "batch_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Esi {
            requester,
            cfg: self.cfg,
            token: self.token,
        })
    }
}

impl Esi {
    /// Start building a new client.
    #[must_use]
    pub fn builder() -> EsiBuilder {
        EsiBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &EsiConfig {
        &self.cfg
    }

    /// A clone of this client that authenticates with `token`.
    #[must_use]
    pub fn with_token(&self, token: AuthToken) -> Self {
        Self {
            token: Some(token),
            ..self.clone()
        }
    }

    /// Batcher for a bulk endpoint accepting at most `max_batch_size` ids,
    /// bounded by the configured batch concurrency.
    #[must_use]
    pub fn batcher(&self, max_batch_size: usize) -> Batcher {
        Batcher::new(max_batch_size, self.cfg.batch_concurrency)
    }

    /// Wrap a requester future with the configured deadline, if any.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "esi::core::requester_call_with_timeout",
            skip(fut),
            fields(route = %route),
        )
    )]
    pub(crate) async fn requester_call_with_timeout<Fut>(
        route: RouteId,
        timeout: Option<Duration>,
        fut: Fut,
    ) -> Result<Value, EsiError>
    where
        Fut: core::future::Future<Output = Result<Value, EsiError>>,
    {
        match timeout {
            Some(t) => (tokio::time::timeout(t, fut).await)
                .unwrap_or_else(|_| Err(EsiError::request_timeout(route.as_str()))),
            None => fut.await,
        }
    }

    /// Call a public route and decode its payload.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        route: RouteId,
        params: RequestParams,
    ) -> Result<T, EsiError> {
        let fut = self.requester.request(route, params, None);
        let value = Self::requester_call_with_timeout(route, self.cfg.request_timeout, fut).await?;
        decode(route, value)
    }

    /// Call a route that requires the access token and decode its payload.
    pub(crate) async fn get_authed<T: DeserializeOwned>(
        &self,
        route: RouteId,
        params: RequestParams,
    ) -> Result<T, EsiError> {
        let Some(token) = self.token.as_ref() else {
            return Err(EsiError::unauthorized(route.as_str()));
        };
        let fut = self.requester.request(route, params, Some(token));
        let value = Self::requester_call_with_timeout(route, self.cfg.request_timeout, fut).await?;
        decode(route, value)
    }
}
