use esi::{Id, IdHandle, Scope, Scoped, Selection, Starbase};
use futures::TryStreamExt;

use crate::helpers::{MY_CORP, mock_esi, serve_corporations};

#[tokio::test]
async fn select_builds_the_matching_adapter() {
    let (esi, ctl) = mock_esi();
    serve_corporations(&ctl, 30).await;
    let starbases = esi.corporation(IdHandle::Fixed(MY_CORP)).starbases();

    let one: Id = 1_000_007;
    match starbases.select(one) {
        Selection::Single(sb) => assert_eq!(sb.get().await.unwrap().starbase_id, one),
        _ => panic!("expected a single-id adapter"),
    }

    let many: Vec<Id> = vec![1_000_001, 1_000_030, 42];
    let found = starbases.select(many).mapped().unwrap().get().await.unwrap();
    assert_eq!(found.len(), 2);

    let all: Vec<Starbase> = starbases
        .select(Scope::All)
        .iterated()
        .unwrap()
        .stream()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(all.len(), 30);
}

#[tokio::test]
async fn systems_dispatch_on_a_runtime_scope() {
    let (esi, ctl) = mock_esi();
    crate::helpers::serve_universe(&ctl, 3).await;
    let systems = esi.universe().systems();
    let first = crate::helpers::fixtures::universe::FIRST_SYSTEM_ID;

    let scopes = [
        Scope::from(first),
        Scope::from(vec![first, first + 2]),
        Scope::All,
    ];
    let mut seen = Vec::new();
    for scope in scopes {
        let n = match systems.select(scope) {
            Selection::Single(s) => usize::from(s.get().await.is_ok()),
            Selection::Mapped(m) => m.get().await.unwrap().len(),
            Selection::Iterated(a) => a.ids().try_collect::<Vec<_>>().await.unwrap().len(),
        };
        seen.push(n);
    }
    assert_eq!(seen, vec![1, 2, 3]);
}
