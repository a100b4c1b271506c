//! esi-core
//!
//! The resource access core shared by every domain module of the esi client.
//!
//! - `requester`: the single capability the core needs from its environment,
//!   a `Requester` that turns a route id and parameters into JSON.
//! - `stream`: lazy sequences over page-numbered, cursor-driven and
//!   single-shot endpoints, plus a memoizing wrapper that shares fetched pages.
//! - `batch`: partitioning of large id sets into provider-sized groups.
//! - `filter`: per-id views over an already fetched (or streamed) index.
//! - `handle` and `resource`: id scopes and the single / mapped / iterated
//!   adapter shapes assembled from the primitives above.
//!
//! Async runtime
//! -------------
//! Streams and futures produced here are runtime-agnostic, but the memoized
//! streamer uses `tokio::sync::Mutex`, and the tests assume Tokio 1.x.
//!
#![warn(missing_docs)]

/// Partitioning of id sets into bulk-request groups.
pub mod batch;
/// Per-id lookups over an already fetched index.
pub mod filter;
/// Fixed and lazily resolved id scopes.
pub mod handle;
/// Middleware trait implemented by requester wrappers.
pub mod middleware;
/// The request collaborator and JSON decoding.
pub mod requester;
/// Single, mapped and iterated resource adapters.
pub mod resource;
/// Lazy sequences over paginated endpoints.
pub mod stream;

pub use batch::Batcher;
pub use filter::{
    filter_many, filter_many_streamed, filter_one, filter_one_streamed, ids, ids_streamed,
};
pub use handle::{IdHandle, IdSetHandle};
pub use middleware::Middleware;
pub use requester::{Requester, decode};
pub use resource::{IteratedResource, MappedResource, SingleResource};
pub use stream::{
    ArrayStreamer, CursorDirection, CursorStreamer, ItemStream, Memoized, PageStreamer,
    SourceFailure, Streamer, end_on_error, split_failure,
};

pub use esi_types::{
    AuthToken, CacheConfig, ErrorLimitConfig, ErrorLimitState, EsiConfig, EsiError, Id,
    RequestParams, RouteId,
};
