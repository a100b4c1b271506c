use std::collections::HashMap;

use esi::api::universe::{NAMES, NAMES_MAX_IDS, SYSTEM, SYSTEMS};
use esi::{EntityName, EsiError, Id, IdHandle, IdSetHandle, NameCategory, Scoped, SolarSystem};
use futures::TryStreamExt;

use crate::helpers::{ME, MY_CORP, UNKNOWN, fixtures, mock_esi, serve_universe};

const FIRST: Id = fixtures::universe::FIRST_SYSTEM_ID;

#[tokio::test]
async fn names_resolve_mixed_categories() {
    let (esi, ctl) = mock_esi();
    serve_universe(&ctl, 3).await;

    let names = esi
        .universe()
        .names([FIRST, ME, MY_CORP, UNKNOWN])
        .await
        .unwrap();
    assert_eq!(names.len(), 3);
    assert_eq!(names[&FIRST].category, NameCategory::SolarSystem);
    assert_eq!(names[&ME].category, NameCategory::Character);
    assert_eq!(names[&MY_CORP].name, "Interstellar Logistics");
    assert!(!names.contains_key(&UNKNOWN));
    assert_eq!(ctl.call_count(NAMES).await, 1);
}

#[tokio::test]
async fn names_of_nothing_make_no_request() {
    let (esi, ctl) = mock_esi();
    serve_universe(&ctl, 3).await;

    let names = esi.universe().names(std::iter::empty()).await.unwrap();
    assert!(names.is_empty());
    assert_eq!(ctl.call_count(NAMES).await, 0);
}

#[tokio::test]
async fn names_stream_splits_into_groups() {
    let (esi, ctl) = mock_esi();
    serve_universe(&ctl, 2500).await;

    let pairs: HashMap<Id, EntityName> = esi
        .universe()
        .names_stream((0..2500).map(|i| FIRST + i))
        .try_collect()
        .await
        .unwrap();
    assert_eq!(pairs.len(), 2500);
    assert_eq!(ctl.call_count(NAMES).await, 3);
    assert!(ctl.requests(NAMES).await.iter().all(|r| {
        r.params
            .body
            .as_ref()
            .and_then(|b| b.as_array())
            .is_some_and(|ids| ids.len() <= NAMES_MAX_IDS)
    }));
}

#[tokio::test]
async fn one_system() {
    let (esi, ctl) = mock_esi();
    serve_universe(&ctl, 3).await;
    let systems = esi.universe().systems();

    let sys = systems.for_one(IdHandle::Fixed(FIRST + 1)).get().await.unwrap();
    assert_eq!(sys.system_id, FIRST + 1);
    assert_eq!(sys.name, "J100001");

    let err = systems.for_one(IdHandle::Fixed(UNKNOWN)).get().await.unwrap_err();
    assert!(matches!(err, EsiError::NotFound { ref what } if what == "solar system 9999"));
    assert_eq!(ctl.call_count(SYSTEMS).await, 0);
}

#[tokio::test]
async fn many_systems_details_and_names() {
    let (esi, ctl) = mock_esi();
    serve_universe(&ctl, 5).await;
    let systems = esi.universe().systems();
    let set = systems.for_many(IdSetHandle::from_iter([FIRST, FIRST + 4, UNKNOWN]));

    let details = set.get().await.unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(ctl.call_count(SYSTEM).await, 3);

    let names = set.names().await.unwrap();
    assert_eq!(names.len(), 2);
    assert_eq!(ctl.call_count(NAMES).await, 1);
}

#[tokio::test]
async fn all_systems_share_one_index_fetch() {
    let (esi, ctl) = mock_esi();
    serve_universe(&ctl, 1200).await;
    let all = esi.universe().systems().for_all();

    let ids: Vec<Id> = all.ids().try_collect().await.unwrap();
    assert_eq!(ids.len(), 1200);

    let names: HashMap<Id, EntityName> = all.names().try_collect().await.unwrap();
    assert_eq!(names.len(), 1200);
    assert_eq!(ctl.call_count(NAMES).await, 2);

    // the id index was fetched once for both traversals
    assert_eq!(ctl.call_count(SYSTEMS).await, 1);
}

#[tokio::test]
async fn all_systems_details_skip_unknown_ids() {
    let (esi, ctl) = mock_esi();
    serve_universe(&ctl, 4).await;
    // the index lists one id the detail route does not know
    let mut ids = fixtures::universe::system_ids(4);
    if let Some(arr) = ids.as_array_mut() {
        arr.push(serde_json::json!(UNKNOWN));
    }
    ctl.set_behavior(SYSTEMS, crate::helpers::MockBehavior::Return(ids))
        .await;

    let details: HashMap<Id, SolarSystem> = esi
        .universe()
        .systems()
        .for_all()
        .details()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(details.len(), 4);
    assert!(!details.contains_key(&UNKNOWN));
    assert_eq!(ctl.call_count(SYSTEM).await, 5);
}
