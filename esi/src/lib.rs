//! Typed, lazily paginated access to the EVE Swagger Interface.
//!
//! Overview
//! - Every remote call goes through one [`Requester`]; wrap the transport
//!   with [`RequesterBuilder`] to add response caching and the error-limit
//!   guard.
//! - Domain accessors (`character`, `corporation`, `universe`, `killmail`)
//!   build on the `esi-core` adapters: streamers for page- and
//!   cursor-paginated listings, a batcher for bulk lookups, and
//!   single / mapped / iterated resource shapes.
//! - Sequences are lazy: nothing is fetched until a stream is polled, and
//!   a page is only requested once the consumer reaches it.
//!
//! Key behaviors and trade-offs
//! - Bulk lookups: id sets are de-duplicated, split into groups the endpoint
//!   accepts, and dispatched with at most `batch_concurrency` groups in
//!   flight. The eager form is all-or-nothing; the streaming form yields
//!   groups as they settle and ends at the first failure.
//! - Index-only records (starbases): per-id reads scan the shared listing and
//!   stop at the last page they need. The listing is memoized per accessor,
//!   so repeated reads reuse fetched pages.
//! - Dynamic ids: a handle such as "this character's corporation" is looked
//!   up whenever it is resolved; paginated listings pin it for their lifetime
//!   so all pages agree.
//! - Failures are never retried. A failed step is yielded as an `Err` and
//!   ends its sequence.
//!
//! Examples
//! Building a client over a cached, error-limited requester:
//! ```rust,ignore
//! use std::sync::Arc;
//! use esi::{Esi, RequesterBuilder, CacheConfig, ErrorLimitConfig};
//!
//! let transport: Arc<dyn esi::Requester> = Arc::new(MyHttpRequester::new());
//! let requester = RequesterBuilder::new(transport)
//!     .with_error_limit(&ErrorLimitConfig::default())
//!     .with_cache(&CacheConfig::default())
//!     .build();
//!
//! let esi = Esi::builder()
//!     .with_requester(requester)
//!     .batch_concurrency(4)
//!     .build()?;
//! ```
//!
//! Walking a character's recent killmails, newest first:
//! ```rust,ignore
//! use futures::TryStreamExt;
//!
//! let me = esi.with_token(token).character(90_000_001);
//! let mut kills = me.killmails().details();
//! while let Some(km) = kills.try_next().await? {
//!     println!("{} in {}", km.killmail_id, km.solar_system_id);
//! }
//! ```
//!
//! Picking an access shape at runtime:
//! ```rust,ignore
//! use esi::{Scope, Scoped, Selection};
//!
//! let starbases = esi.corporation(98_000_001).starbases();
//! match starbases.select(Scope::from(vec![1_000_001, 1_000_002])) {
//!     Selection::Mapped(set) => { let found = set.get().await?; }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! See `esi/examples/` for a runnable demonstration against the mock requester.
#![warn(missing_docs)]

pub mod api;
pub(crate) mod core;

pub use core::{Esi, EsiBuilder};

pub use api::character::{Affiliation, Character, CharacterRef, CharacterSet};
pub use api::corporation::{
    Corporation, CorporationRef, CorporationSet, Starbase, StarbaseRef, StarbaseSet,
    StarbaseState, Starbases,
};
pub use api::killmails::{Killmail, KillmailLink, RecentKillmails, Victim};
pub use api::scope::{Scope, Scoped, Selection};
pub use api::universe::{
    AllSystems, EntityName, NameCategory, SolarSystem, System, SystemSet, Systems, Universe,
};

pub use esi_middleware::{
    CacheMiddleware, CachingRequester, ErrorLimitMiddleware, ErrorLimitRequester,
    RequesterBuilder,
};

// Re-export core types for convenience
pub use esi_core::{
    AuthToken, Batcher, CacheConfig, CursorDirection, CursorStreamer, ErrorLimitConfig,
    ErrorLimitState, EsiConfig, EsiError, Id, IdHandle, IdSetHandle, ItemStream,
    IteratedResource, MappedResource, Memoized, Middleware, PageStreamer, RequestParams,
    Requester, RouteId, SingleResource, Streamer,
};
