use std::collections::HashMap;
use std::time::Duration;

use esi::api::character::CHARACTER;
use esi::api::corporation::STARBASES;
use esi::{
    CacheConfig, ErrorLimitConfig, EsiError, IdHandle, RequesterBuilder, Starbase,
};
use futures::TryStreamExt;

use crate::helpers::{
    ME, MY_CORP, MockBehavior, MockRequester, esi_over, serve_characters, serve_corporations,
};

#[tokio::test]
async fn cached_responses_skip_the_transport() {
    let (raw, ctl) = MockRequester::new_with_controller("mock");
    serve_characters(&ctl).await;
    serve_corporations(&ctl, 1500).await;
    let esi = esi_over(
        RequesterBuilder::new(raw)
            .with_cache(&CacheConfig::default())
            .without_error_limit()
            .build(),
    );

    let me = esi.character(IdHandle::Fixed(ME));
    let a = me.info().await.unwrap();
    let b = me.info().await.unwrap();
    assert_eq!(a, b);
    assert_eq!(ctl.call_count(CHARACTER).await, 1);

    // a refreshed listing is replayed from the response cache
    let starbases = esi.corporation(IdHandle::Fixed(MY_CORP)).starbases();
    let first: Vec<Starbase> = starbases.stream().try_collect().await.unwrap();
    starbases.refresh();
    let second: Vec<Starbase> = starbases.stream().try_collect().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(ctl.call_count(STARBASES).await, 2);
}

#[tokio::test]
async fn uncached_route_reaches_the_transport_every_time() {
    let (raw, ctl) = MockRequester::new_with_controller("mock");
    serve_characters(&ctl).await;
    let cfg = CacheConfig {
        per_route_ttl_ms: HashMap::from([(CHARACTER.as_str().to_string(), 0)]),
        ..CacheConfig::default()
    };
    let esi = esi_over(RequesterBuilder::new(raw).with_cache(&cfg).build());

    let me = esi.character(IdHandle::Fixed(ME));
    me.info().await.unwrap();
    me.info().await.unwrap();
    assert_eq!(ctl.call_count(CHARACTER).await, 2);
}

#[tokio::test]
async fn error_budget_stops_a_failing_listing() {
    let (raw, ctl) = MockRequester::new_with_controller("mock");
    ctl.set_behavior(
        STARBASES,
        MockBehavior::Fail(EsiError::request(STARBASES.as_str(), "500")),
    )
    .await;
    let esi = esi_over(
        RequesterBuilder::new(raw)
            .without_cache()
            .with_error_limit(&ErrorLimitConfig {
                limit: 2,
                window: Duration::from_secs(60),
            })
            .build(),
    );

    let starbases = esi.corporation(IdHandle::Fixed(MY_CORP)).starbases();
    for _ in 0..2 {
        let res: Result<Vec<Starbase>, _> = starbases.stream().try_collect().await;
        assert!(matches!(res, Err(EsiError::Request { .. })));
    }
    let res: Result<Vec<Starbase>, _> = starbases.stream().try_collect().await;
    assert!(matches!(res, Err(EsiError::ErrorLimited { remaining: 0, .. })));
    assert_eq!(ctl.call_count(STARBASES).await, 2);
}
