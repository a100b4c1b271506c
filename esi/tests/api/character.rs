use esi::api::character::{AFFILIATION, AFFILIATION_MAX_IDS, CHARACTER};
use esi::{EsiError, Id, IdHandle, IdSetHandle};

use crate::helpers::{ME, MY_CORP, UNKNOWN, mock_esi, serve_characters};

#[tokio::test]
async fn character_info() {
    let (esi, ctl) = mock_esi();
    serve_characters(&ctl).await;

    let me = esi.character(IdHandle::Fixed(ME)).info().await.unwrap();
    assert_eq!(me.name, "Aura Vex");
    assert_eq!(me.corporation_id, MY_CORP);
    assert_eq!(me.security_status, Some(2.5));

    let fresh = esi.character(IdHandle::Fixed(90_000_003)).info().await.unwrap();
    assert_eq!(fresh.security_status, None);
    assert_eq!(fresh.alliance_id, None);

    // public route
    assert!(ctl.requests(CHARACTER).await.iter().all(|r| !r.authenticated));
}

#[tokio::test]
async fn unknown_character_is_not_found() {
    let (esi, ctl) = mock_esi();
    serve_characters(&ctl).await;

    let err = esi.character(IdHandle::Fixed(UNKNOWN)).info().await.unwrap_err();
    assert!(matches!(err, EsiError::NotFound { ref what } if what == "character 9999"));
    assert!(!err.is_actionable());
}

#[tokio::test]
async fn character_set_info_fetches_each_id() {
    let (esi, ctl) = mock_esi();
    serve_characters(&ctl).await;

    let ids: Vec<Id> = vec![ME, 90_000_002, UNKNOWN, ME];
    let found = esi.characters(ids).info().await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[&90_000_002].name, "Ivo Kestrel");
    // duplicates collapse before fetching
    assert_eq!(ctl.call_count(CHARACTER).await, 3);
}

#[tokio::test]
async fn affiliations_use_one_bulk_call_per_group() {
    let (esi, ctl) = mock_esi();
    serve_characters(&ctl).await;

    let ids: Vec<Id> = vec![ME, 90_000_002, 90_000_003, UNKNOWN];
    let found = esi.characters(ids).affiliations().await.unwrap();
    assert_eq!(found.len(), 3);
    assert_eq!(found[&ME].alliance_id, Some(99_000_001));
    assert_eq!(found[&90_000_003].corporation_id, 1_000_125);
    assert_eq!(ctl.call_count(AFFILIATION).await, 1);
}

#[tokio::test]
async fn large_affiliation_lookups_are_split() {
    let (esi, ctl) = mock_esi();
    serve_characters(&ctl).await;

    let ids = IdSetHandle::from_iter((0..2500).map(|i| 90_000_001 + i));
    let found = esi.characters(ids).affiliations().await.unwrap();
    assert_eq!(found.len(), 3);

    let bodies: Vec<usize> = ctl
        .requests(AFFILIATION)
        .await
        .iter()
        .map(|r| r.params.body.as_ref().and_then(|b| b.as_array()).map_or(0, Vec::len))
        .collect();
    assert_eq!(bodies.len(), 3);
    assert!(bodies.iter().all(|n| *n <= AFFILIATION_MAX_IDS));
    assert_eq!(bodies.iter().sum::<usize>(), 2500);
}

#[tokio::test]
async fn affiliation_group_failure_fails_the_lookup() {
    let (esi, ctl) = mock_esi();
    ctl.set_behavior(
        AFFILIATION,
        crate::helpers::MockBehavior::Fail(EsiError::request(AFFILIATION.as_str(), "420")),
    )
    .await;

    let ids: Vec<Id> = vec![ME];
    let err = esi.characters(ids).affiliations().await.unwrap_err();
    assert!(matches!(err, EsiError::Request { ref route, .. } if route == AFFILIATION.as_str()));
}
