use std::collections::HashMap;

use esi::api::{character, corporation, killmails, universe};
use esi::{AuthToken, CacheConfig, Esi, ErrorLimitConfig, IdHandle, RequesterBuilder, Scoped};
use esi_mock::{MockBehavior, MockRequester, fixtures};
use futures::TryStreamExt;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize a human-friendly tracing subscriber with env-based filtering.
    // Suggested: RUST_LOG=info,esi=trace,esi_core=trace,esi_middleware=debug
    // and build with `--features tracing`.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    // Serve fixtures from the mock requester and wrap it in the default stack.
    let (raw, ctl) = MockRequester::new_with_controller("mock");
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
        corporation::STARBASES,
        MockBehavior::Paged {
            page_size: corporation::STARBASES_PAGE_SIZE,
            items: fixtures::corporation::starbases(2_500),
        },
    )
    .await;
    ctl.set_behavior(
        killmails::RECENT,
        MockBehavior::Cursor {
            batch_size: killmails::RECENT_BATCH_SIZE,
            param: killmails::BOUNDARY_PARAM,
            key: "killmail_id",
            descending: true,
            items: fixtures::killmails::links(2_500),
        },
    )
    .await;
    ctl.set_behavior(
        universe::NAMES,
        MockBehavior::Bulk {
            max_ids: universe::NAMES_MAX_IDS,
            key: "id",
            items: fixtures::universe::names(3_000),
        },
    )
    .await;

    let requester = RequesterBuilder::new(raw)
        .with_error_limit(&ErrorLimitConfig::default())
        .with_cache(&CacheConfig::default())
        .build();
    let esi = Esi::builder()
        .with_requester(requester)
        .token(AuthToken::new("example-token"))
        .build()?;

    // Character and its (dynamically resolved) corporation's starbases.
    let me = esi.character(IdHandle::Fixed(90_000_001));
    let info = me.info().await?;
    println!("{} (corporation {})", info.name, info.corporation_id);

    let starbases = me.corporation().starbases();
    let one = starbases.for_one(IdHandle::Fixed(1_001_200)).get().await?;
    println!("starbase {} in system {}", one.starbase_id, one.system_id);

    // Recent killmails, walked through the cursor newest first.
    let links: Vec<_> = me.killmails().links().try_collect().await?;
    println!("{} recent killmails", links.len());

    // Bulk names, split into groups the endpoint accepts.
    let first = fixtures::universe::FIRST_SYSTEM_ID;
    let names: HashMap<_, _> = esi.universe().names((0..3_000).map(|i| first + i)).await?;
    println!("resolved {} names", names.len());

    Ok(())
}
