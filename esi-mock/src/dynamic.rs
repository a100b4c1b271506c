use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use esi_core::{AuthToken, EsiError, Id, RequestParams, Requester, RouteId};

/// How a route answers.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the payload as-is.
    Return(Value),
    /// Fail with the provided error.
    Fail(EsiError),
    /// Never answer (simulate a stalled request).
    Hang,
    /// Serve `items` in pages of `page_size`, selected by the `page` query
    /// parameter (1-based, default 1).
    Paged {
        /// Items per full page.
        page_size: usize,
        /// Backing records in page order.
        items: Vec<Value>,
    },
    /// Serve `items` in keyset batches. The boundary is read from the `param`
    /// query parameter; records strictly beyond it are returned, at most
    /// `batch_size` at a time.
    Cursor {
        /// Maximum records per batch.
        batch_size: usize,
        /// Query parameter carrying the boundary (e.g. `max_kill_id`).
        param: &'static str,
        /// Record field holding the key.
        key: &'static str,
        /// Newest first when `true`.
        descending: bool,
        /// Backing records, any order.
        items: Vec<Value>,
    },
    /// Bulk lookup: the body is a JSON array of ids; records whose `key` is
    /// among them are returned. More than `max_ids` ids fails the request.
    Bulk {
        /// Largest accepted body.
        max_ids: usize,
        /// Record field holding the id.
        key: &'static str,
        /// Backing records.
        items: Vec<Value>,
    },
    /// Per-id lookup: the id is read from the `param` path parameter and the
    /// record whose `key` matches is returned, or `NotFound`.
    Keyed {
        /// Path parameter carrying the id.
        param: &'static str,
        /// Record field holding the id.
        key: &'static str,
        /// Backing records.
        items: Vec<Value>,
    },
}

/// One logged call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Parameters exactly as received.
    pub params: RequestParams,
    /// Whether a token accompanied the call.
    pub authenticated: bool,
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<&'static str, MockBehavior>,
    log: HashMap<&'static str, Vec<RecordedRequest>>,
}

/// Controller handle used by tests to drive a [`MockRequester`] from the outside.
#[derive(Clone)]
pub struct MockController {
    state: Arc<Mutex<InternalState>>,
}

impl MockController {
    /// Install (or replace) the behavior of a route.
    pub async fn set_behavior(&self, route: RouteId, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(route.as_str(), behavior);
    }

    /// Calls made to `route` so far, oldest first.
    pub async fn requests(&self, route: RouteId) -> Vec<RecordedRequest> {
        let guard = self.state.lock().await;
        guard.log.get(route.as_str()).cloned().unwrap_or_default()
    }

    /// Number of calls made to `route` so far.
    pub async fn call_count(&self, route: RouteId) -> usize {
        let guard = self.state.lock().await;
        guard.log.get(route.as_str()).map_or(0, Vec::len)
    }

    /// Forget the request log, keeping behaviors.
    pub async fn clear_log(&self) {
        self.state.lock().await.log.clear();
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.log.clear();
    }
}

/// A requester that defers all behavior to an external controller.
pub struct MockRequester {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl MockRequester {
    /// Create a new mock requester and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn Requester>, MockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = MockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn Requester>, controller)
    }
}

#[async_trait]
impl Requester for MockRequester {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn request(
        &self,
        route: RouteId,
        params: RequestParams,
        token: Option<&AuthToken>,
    ) -> Result<Value, EsiError> {
        // Log and snapshot the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard
                .log
                .entry(route.as_str())
                .or_default()
                .push(RecordedRequest {
                    params: params.clone(),
                    authenticated: token.is_some(),
                });
            guard.rules.get(route.as_str()).cloned()
        };

        match behavior {
            Some(MockBehavior::Return(v)) => Ok(v),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            Some(MockBehavior::Paged { page_size, items }) => {
                let page = int_param(route, params.query_param("page"))?.unwrap_or(1);
                let page = usize::try_from(page.max(1)).unwrap_or(usize::MAX);
                let start = (page - 1).saturating_mul(page_size);
                Ok(Value::Array(
                    items.into_iter().skip(start).take(page_size).collect(),
                ))
            }
            Some(MockBehavior::Cursor {
                batch_size,
                param,
                key,
                descending,
                items,
            }) => {
                let boundary = int_param(route, params.query_param(param))?;
                let mut keyed: Vec<(Id, Value)> = items
                    .into_iter()
                    .filter_map(|v| key_of(&v, key).map(|k| (k, v)))
                    .filter(|(k, _)| match boundary {
                        Some(b) if descending => *k < b,
                        Some(b) => *k > b,
                        None => true,
                    })
                    .collect();
                keyed.sort_by_key(|(k, _)| *k);
                if descending {
                    keyed.reverse();
                }
                Ok(Value::Array(
                    keyed.into_iter().take(batch_size).map(|(_, v)| v).collect(),
                ))
            }
            Some(MockBehavior::Bulk {
                max_ids,
                key,
                items,
            }) => {
                let ids: Vec<Id> = match &params.body {
                    Some(body) => serde_json::from_value(body.clone())
                        .map_err(|e| EsiError::request(route.as_str(), e.to_string()))?,
                    None => return Err(EsiError::request(route.as_str(), "missing body")),
                };
                if ids.len() > max_ids {
                    return Err(EsiError::request(
                        route.as_str(),
                        format!("{} ids exceeds the maximum of {max_ids}", ids.len()),
                    ));
                }
                let wanted: HashSet<Id> = ids.into_iter().collect();
                Ok(Value::Array(
                    items
                        .into_iter()
                        .filter(|v| key_of(v, key).is_some_and(|k| wanted.contains(&k)))
                        .collect(),
                ))
            }
            Some(MockBehavior::Keyed { param, key, items }) => {
                let id = int_param(route, params.path_param(param))?.ok_or_else(|| {
                    EsiError::request(route.as_str(), format!("missing path parameter {param}"))
                })?;
                items
                    .into_iter()
                    .find(|v| key_of(v, key) == Some(id))
                    .ok_or_else(|| EsiError::not_found(format!("{route} {id}")))
            }
            None => Err(EsiError::request(
                route.as_str(),
                format!("no behavior configured on {}", self.name),
            )),
        }
    }
}

fn key_of(v: &Value, key: &str) -> Option<Id> {
    v.get(key).and_then(Value::as_i64)
}

fn int_param(route: RouteId, v: Option<&Value>) -> Result<Option<Id>, EsiError> {
    match v {
        None => Ok(None),
        Some(v) => v.as_i64().map(Some).ok_or_else(|| {
            EsiError::request(route.as_str(), format!("expected an integer parameter, got {v}"))
        }),
    }
}
