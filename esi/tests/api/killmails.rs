use std::time::Duration;

use async_trait::async_trait;
use esi::api::killmails::{BOUNDARY_PARAM, KILLMAIL, RECENT, RECENT_BATCH_SIZE};
use esi::{AuthToken, Esi, EsiError, IdHandle, KillmailLink, RequestParams, Requester, RouteId};
use futures::TryStreamExt;
use serde_json::Value;

use crate::helpers::{ME, anonymous_esi, fixtures, mock_esi, serve_killmails, token};

#[tokio::test]
async fn recent_links_walk_the_cursor_newest_first() {
    let (esi, ctl) = mock_esi();
    serve_killmails(&ctl, 2500).await;

    let links: Vec<KillmailLink> = esi
        .character(IdHandle::Fixed(ME))
        .killmails()
        .links()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(links.len(), 2500);
    assert_eq!(links.first().map(|l| l.killmail_id), Some(2500));
    assert_eq!(links.last().map(|l| l.killmail_id), Some(1));
    assert!(links.windows(2).all(|w| w[0].killmail_id > w[1].killmail_id));

    let calls = ctl.requests(RECENT).await;
    let boundaries: Vec<Option<i64>> = calls
        .iter()
        .map(|r| r.params.query_param(BOUNDARY_PARAM).and_then(|v| v.as_i64()))
        .collect();
    assert_eq!(boundaries, vec![None, Some(1501), Some(501)]);
    assert!(calls.iter().all(|r| r.authenticated));
    assert!(
        calls
            .iter()
            .all(|r| r.params.path_param("character_id").and_then(|v| v.as_i64()) == Some(ME))
    );
}

#[tokio::test]
async fn links_are_fetched_only_as_far_as_consumed() {
    let (esi, ctl) = mock_esi();
    serve_killmails(&ctl, 2500).await;

    let mut links = esi.character(IdHandle::Fixed(ME)).killmails().links();
    for _ in 0..1000 {
        links.try_next().await.unwrap().unwrap();
    }
    assert_eq!(ctl.call_count(RECENT).await, 1);
    links.try_next().await.unwrap().unwrap();
    assert_eq!(ctl.call_count(RECENT).await, 2);
}

#[tokio::test]
async fn details_follow_link_order() {
    let (esi, ctl) = mock_esi();
    serve_killmails(&ctl, 25).await;

    let kills: Vec<_> = esi
        .character(IdHandle::Fixed(ME))
        .killmails()
        .details()
        .try_collect()
        .await
        .unwrap();

    let ids: Vec<i64> = kills.iter().map(|k| k.killmail_id).collect();
    assert_eq!(ids, (1..=25).rev().collect::<Vec<_>>());
    assert_eq!(kills[0].victim.character_id, Some(90_000_025));
    assert_eq!(ctl.call_count(KILLMAIL).await, 25);

    // detail fetches are public
    assert!(ctl.requests(KILLMAIL).await.iter().all(|r| !r.authenticated));
}

#[tokio::test]
async fn single_killmail_passes_id_and_hash() {
    let (esi, ctl) = mock_esi();
    serve_killmails(&ctl, 3).await;

    let link = KillmailLink {
        killmail_id: 2,
        killmail_hash: fixtures::killmails::hash(2),
    };
    let km = esi.killmail(&link).await.unwrap();
    assert_eq!(km.killmail_id, 2);

    let req = &ctl.requests(KILLMAIL).await[0];
    assert_eq!(
        req.params.path_param("killmail_hash").and_then(|v| v.as_str()),
        Some(fixtures::killmails::hash(2).as_str())
    );

    let missing = KillmailLink {
        killmail_id: 77,
        killmail_hash: "00".into(),
    };
    let err = esi.killmail(&missing).await.unwrap_err();
    assert!(matches!(err, EsiError::NotFound { ref what } if what == "killmail 77"));
}

#[tokio::test]
async fn recent_killmails_need_a_token() {
    let (esi, ctl) = anonymous_esi();
    serve_killmails(&ctl, 10).await;

    let res: Result<Vec<KillmailLink>, _> = esi
        .character(IdHandle::Fixed(ME))
        .killmails()
        .links()
        .try_collect()
        .await;

    assert!(matches!(res, Err(EsiError::Unauthorized { .. })));
    assert_eq!(ctl.call_count(RECENT).await, 0);
}

#[tokio::test]
async fn a_failed_detail_ends_the_sequence() {
    let (esi, ctl) = mock_esi();
    serve_killmails(&ctl, 5).await;
    ctl.set_behavior(
        KILLMAIL,
        crate::helpers::MockBehavior::Fail(EsiError::request(KILLMAIL.as_str(), "502")),
    )
    .await;

    let items: Vec<_> = futures::StreamExt::collect::<Vec<_>>(
        esi.character(IdHandle::Fixed(ME)).killmails().details(),
    )
    .await;
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0], Err(EsiError::Request { .. })));
}

/// Serves one full batch of links, fails the next cursor step, and answers
/// killmail details slowly.
struct BrokenSecondPage;

#[async_trait]
impl Requester for BrokenSecondPage {
    fn name(&self) -> &'static str {
        "broken-second-page"
    }

    async fn request(
        &self,
        route: RouteId,
        params: RequestParams,
        _token: Option<&AuthToken>,
    ) -> Result<Value, EsiError> {
        if route == RECENT {
            if params.query_param(BOUNDARY_PARAM).is_some() {
                return Err(EsiError::request(RECENT.as_str(), "503"));
            }
            let batch = fixtures::killmails::links(2000);
            return Ok(Value::Array(batch[..RECENT_BATCH_SIZE].to_vec()));
        }
        assert_eq!(route, KILLMAIL);
        tokio::time::sleep(Duration::from_millis(20)).await;
        let id = params
            .path_param("killmail_id")
            .and_then(Value::as_i64)
            .unwrap_or_default();
        Ok(fixtures::killmails::killmail(id))
    }
}

#[tokio::test(start_paused = true)]
async fn listing_failure_comes_after_details_already_listed() {
    let esi = Esi::builder()
        .with_requester(std::sync::Arc::new(BrokenSecondPage))
        .token(token())
        .build()
        .unwrap();

    let items: Vec<_> = futures::StreamExt::collect::<Vec<_>>(
        esi.character(IdHandle::Fixed(ME)).killmails().details(),
    )
    .await;

    assert_eq!(items.len(), RECENT_BATCH_SIZE + 1);
    let ids: Vec<i64> = items[..RECENT_BATCH_SIZE]
        .iter()
        .map(|r| r.as_ref().unwrap().killmail_id)
        .collect();
    assert_eq!(ids, (1001..=2000).rev().collect::<Vec<_>>());
    assert!(matches!(items.last(), Some(Err(EsiError::Request { .. }))));
}
