// Re-export helpers so tests can `use crate::helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;

use esi::api::{character, corporation, killmails, universe};
use esi::{AuthToken, Esi, Id};
pub use esi_mock::{MockBehavior, MockController, MockRequester, fixtures};

/// Character used as "me" across tests.
pub const ME: Id = 90_000_001;
/// Corporation of [`ME`].
pub const MY_CORP: Id = 98_000_001;
/// Id no fixture knows.
pub const UNKNOWN: Id = 9_999;

pub fn token() -> AuthToken {
    AuthToken::new("test-access-token")
}

/// Client over a bare mock requester, with an access token.
pub fn mock_esi() -> (Esi, MockController) {
    let (requester, ctl) = MockRequester::new_with_controller("mock");
    let esi = Esi::builder()
        .with_requester(requester)
        .token(token())
        .build()
        .unwrap();
    (esi, ctl)
}

/// Same as [`mock_esi`], without a token.
pub fn anonymous_esi() -> (Esi, MockController) {
    let (requester, ctl) = MockRequester::new_with_controller("mock");
    let esi = Esi::builder().with_requester(requester).build().unwrap();
    (esi, ctl)
}

/// Client over an already wrapped requester.
pub fn esi_over(requester: Arc<dyn esi::Requester>) -> Esi {
    Esi::builder()
        .with_requester(requester)
        .token(token())
        .build()
        .unwrap()
}

pub async fn serve_characters(ctl: &MockController) {
    ctl.set_behavior(
        character::CHARACTER,
        MockBehavior::Keyed {
            param: "character_id",
            key: "character_id",
            items: fixtures::character::characters(),
        },
    )
    .await;
    ctl.set_behavior(
        character::AFFILIATION,
        MockBehavior::Bulk {
            max_ids: character::AFFILIATION_MAX_IDS,
            key: "character_id",
            items: fixtures::character::affiliations(),
        },
    )
    .await;
}

pub async fn serve_corporations(ctl: &MockController, starbases: Id) {
    ctl.set_behavior(
        corporation::CORPORATION,
        MockBehavior::Keyed {
            param: "corporation_id",
            key: "corporation_id",
            items: fixtures::corporation::corporations(),
        },
    )
    .await;
    ctl.set_behavior(
        corporation::STARBASES,
        MockBehavior::Paged {
            page_size: corporation::STARBASES_PAGE_SIZE,
            items: fixtures::corporation::starbases(starbases),
        },
    )
    .await;
}

pub async fn serve_killmails(ctl: &MockController, n: Id) {
    ctl.set_behavior(
        killmails::RECENT,
        MockBehavior::Cursor {
            batch_size: killmails::RECENT_BATCH_SIZE,
            param: killmails::BOUNDARY_PARAM,
            key: "killmail_id",
            descending: true,
            items: fixtures::killmails::links(n),
        },
    )
    .await;
    ctl.set_behavior(
        killmails::KILLMAIL,
        MockBehavior::Keyed {
            param: "killmail_id",
            key: "killmail_id",
            items: fixtures::killmails::killmails(n),
        },
    )
    .await;
}

pub async fn serve_universe(ctl: &MockController, systems: Id) {
    ctl.set_behavior(
        universe::SYSTEMS,
        MockBehavior::Return(fixtures::universe::system_ids(systems)),
    )
    .await;
    ctl.set_behavior(
        universe::SYSTEM,
        MockBehavior::Keyed {
            param: "system_id",
            key: "system_id",
            items: fixtures::universe::systems(systems),
        },
    )
    .await;
    ctl.set_behavior(
        universe::NAMES,
        MockBehavior::Bulk {
            max_ids: universe::NAMES_MAX_IDS,
            key: "id",
            items: fixtures::universe::names(systems),
        },
    )
    .await;
}
