use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use esi::api::character::CHARACTER;
use esi::api::universe::NAMES;
use esi::{AuthToken, Esi, EsiError, Id, IdHandle, RequestParams, Requester, RouteId};
use serde_json::{Value, json};

use crate::helpers::{ME, MockBehavior, MockRequester, mock_esi, serve_characters};

#[test]
fn build_without_requester_is_rejected() {
    let err = Esi::builder().build().err().unwrap();
    assert!(matches!(err, EsiError::InvalidArg(_)));
}

#[test]
fn zero_batch_concurrency_is_rejected() {
    let (requester, _ctl) = MockRequester::new_with_controller("mock");
    let err = Esi::builder()
        .with_requester(requester)
        .batch_concurrency(0)
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, EsiError::InvalidArg(_)));
}

#[test]
fn defaults() {
    let (esi, _ctl) = mock_esi();
    assert_eq!(esi.config().batch_concurrency, 8);
    assert_eq!(esi.config().request_timeout, None);
    assert_eq!(esi.batcher(1000).max_batch_size(), 1000);
    assert_eq!(esi.batcher(1000).concurrency(), 8);
}

#[tokio::test]
async fn stalled_request_times_out_with_its_route() {
    let (requester, ctl) = MockRequester::new_with_controller("mock");
    ctl.set_behavior(CHARACTER, MockBehavior::Hang).await;
    let esi = Esi::builder()
        .with_requester(requester)
        .request_timeout(Duration::from_millis(20))
        .build()
        .unwrap();

    let err = esi.character(IdHandle::Fixed(ME)).info().await.unwrap_err();
    assert_eq!(
        err,
        EsiError::RequestTimeout {
            route: CHARACTER.as_str().to_string()
        }
    );
}

#[tokio::test]
async fn with_token_authenticates_the_clone_only() {
    let (requester, ctl) = MockRequester::new_with_controller("mock");
    serve_characters(&ctl).await;
    let anonymous = Esi::builder().with_requester(requester).build().unwrap();
    let authed = anonymous.with_token(AuthToken::new("t"));

    let links = anonymous.character(IdHandle::Fixed(ME)).killmails().links();
    let res = futures::TryStreamExt::try_collect::<Vec<_>>(links).await;
    assert!(matches!(res, Err(EsiError::Unauthorized { .. })));

    // public routes never carry the token
    authed.character(IdHandle::Fixed(ME)).info().await.unwrap();
    assert!(ctl.requests(CHARACTER).await.iter().all(|r| !r.authenticated));
}

/// Answers the name route after a short delay, tracking peak concurrency.
struct Gauge {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl Requester for Gauge {
    fn name(&self) -> &'static str {
        "gauge"
    }

    async fn request(
        &self,
        route: RouteId,
        params: RequestParams,
        _token: Option<&AuthToken>,
    ) -> Result<Value, EsiError> {
        assert_eq!(route, NAMES);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let ids: Vec<Id> = serde_json::from_value(params.body.unwrap_or_default())?;
        Ok(Value::Array(
            ids.into_iter()
                .map(|id| json!({ "id": id, "name": format!("n{id}"), "category": "station" }))
                .collect(),
        ))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn bulk_groups_respect_batch_concurrency() {
    let gauge = Arc::new(Gauge {
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let esi = Esi::builder()
        .with_requester(gauge.clone())
        .batch_concurrency(2)
        .build()
        .unwrap();

    let names = esi.universe().names(1..=5000).await.unwrap();
    assert_eq!(names.len(), 5000);
    assert!(gauge.peak.load(Ordering::SeqCst) <= 2);
}
