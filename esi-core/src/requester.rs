use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use esi_types::{AuthToken, EsiError, RequestParams, RouteId};

/// The request collaborator.
///
/// Resolves an opaque route id plus parameters into one remote call and
/// returns the decoded JSON payload. HTTP verbs, URLs, headers, retries and
/// authentication mechanics all live behind this trait; the resource core
/// only ever calls `request`.
#[async_trait]
pub trait Requester: Send + Sync {
    /// Stable name of this requester (used in logs and middleware introspection).
    fn name(&self) -> &'static str;

    /// Issue one request.
    ///
    /// # Errors
    /// Returns the collaborator's failure unchanged; the core never retries.
    async fn request(
        &self,
        route: RouteId,
        params: RequestParams,
        token: Option<&AuthToken>,
    ) -> Result<Value, EsiError>;
}

/// Decode a JSON payload returned for `route` into `T`.
///
/// # Errors
/// Returns `EsiError::Decode` tagged with the route when the payload does not
/// match `T`.
pub fn decode<T: DeserializeOwned>(route: RouteId, value: Value) -> Result<T, EsiError> {
    serde_json::from_value(value).map_err(|e| EsiError::decode(route.as_str(), e.to_string()))
}
