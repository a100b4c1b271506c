//! The three access shapes a domain module exposes.
//!
//! A domain module writes its fetch functions once and composes them with
//! one of these adapters:
//!
//! - [`SingleResource`]: one id, fetched directly or found in a shared index.
//! - [`MappedResource`]: a set of ids, fetched per id, through a bulk
//!   endpoint via [`Batcher`], or found in a shared index.
//! - [`IteratedResource`]: every record of an index streamer, optionally
//!   expanded with per-id detail fetches.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};

use crate::batch::Batcher;
use crate::filter::{filter_many_streamed, filter_one_streamed, ids_streamed};
use crate::handle::{IdHandle, IdSetHandle};
use crate::stream::{ItemStream, Streamer, end_on_error, split_failure};
use esi_types::{EsiError, Id};

/// Adapter scoped to a single id.
#[derive(Debug, Clone)]
pub struct SingleResource {
    handle: IdHandle,
}

impl SingleResource {
    /// Scope an adapter to `handle`.
    pub fn new(handle: impl Into<IdHandle>) -> Self {
        Self {
            handle: handle.into(),
        }
    }

    /// The id scope.
    #[must_use]
    pub const fn handle(&self) -> &IdHandle {
        &self.handle
    }

    /// Resolve the scoped id.
    ///
    /// # Errors
    /// Propagates a dynamic resolver failure.
    pub async fn id(&self) -> Result<Id, EsiError> {
        self.handle.resolve().await
    }

    /// Resolve the id and call a per-id fetch function with it.
    ///
    /// # Errors
    /// Propagates resolver and fetch failures.
    pub async fn fetch<T, F, Fut>(&self, fetch: F) -> Result<T, EsiError>
    where
        F: FnOnce(Id) -> Fut,
        Fut: Future<Output = Result<T, EsiError>>,
    {
        let id = self.handle.resolve().await?;
        fetch(id).await
    }

    /// Resolve the id and look it up in a shared index.
    ///
    /// # Errors
    /// Returns `NotFound` when the index has no record for the id, or
    /// propagates resolver and fetch failures.
    pub async fn find<T, S, K>(&self, index: &S, key: K) -> Result<T, EsiError>
    where
        S: Streamer<T> + ?Sized,
        K: Fn(&T) -> Id,
    {
        let id = self.handle.resolve().await?;
        filter_one_streamed(index.stream(), id, key).await
    }
}

/// Adapter scoped to a set of ids.
///
/// Every accessor returns a complete map on success and no map on failure.
/// Ids the source does not know are omitted.
#[derive(Debug, Clone)]
pub struct MappedResource {
    handle: IdSetHandle,
}

impl MappedResource {
    /// Scope an adapter to `handle`.
    pub fn new(handle: impl Into<IdSetHandle>) -> Self {
        Self {
            handle: handle.into(),
        }
    }

    /// The id scope.
    #[must_use]
    pub const fn handle(&self) -> &IdSetHandle {
        &self.handle
    }

    /// Resolve the scoped ids.
    ///
    /// # Errors
    /// Propagates a dynamic resolver failure.
    pub async fn ids(&self) -> Result<BTreeSet<Id>, EsiError> {
        self.handle.resolve().await
    }

    /// Call a per-id fetch function for every id, at most `concurrency` at a time.
    ///
    /// `NotFound` for an id omits it; any other failure fails the whole call.
    ///
    /// # Errors
    /// Propagates resolver failures and the first non-`NotFound` fetch failure.
    pub async fn fetch_each<T, F, Fut>(
        &self,
        concurrency: usize,
        fetch: F,
    ) -> Result<HashMap<Id, T>, EsiError>
    where
        F: Fn(Id) -> Fut,
        Fut: Future<Output = Result<T, EsiError>>,
    {
        let ids = self.handle.resolve().await?;
        let mut pending = stream::iter(ids.into_iter().map(|id| {
            let fut = fetch(id);
            async move { (id, fut.await) }
        }))
        .buffer_unordered(concurrency.max(1));

        let mut out = HashMap::new();
        while let Some((id, res)) = pending.next().await {
            match res {
                Ok(v) => {
                    out.insert(id, v);
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    /// Resolve the ids and look them up through a bulk endpoint.
    ///
    /// # Errors
    /// Propagates resolver failures and the first group failure.
    pub async fn batch<T, F, Fut, K>(
        &self,
        batcher: &Batcher,
        fetch_group: F,
        key: K,
    ) -> Result<HashMap<Id, T>, EsiError>
    where
        F: Fn(Vec<Id>) -> Fut,
        Fut: Future<Output = Result<Vec<T>, EsiError>>,
        K: Fn(&T) -> Id,
    {
        let ids = self.handle.resolve().await?;
        batcher.fetch_map(ids, fetch_group, key).await
    }

    /// Resolve the ids and look them up in a shared index.
    ///
    /// # Errors
    /// Propagates resolver failures and index fetch failures.
    pub async fn find<T, S, K>(&self, index: &S, key: K) -> Result<HashMap<Id, T>, EsiError>
    where
        S: Streamer<T> + ?Sized,
        K: Fn(&T) -> Id,
    {
        let ids = self.handle.resolve().await?;
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        filter_many_streamed(index.stream(), ids, key).await
    }
}

/// Adapter over every record of an index.
pub struct IteratedResource<T> {
    index: Arc<dyn Streamer<T>>,
}

impl<T> Clone for IteratedResource<T> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
        }
    }
}

impl<T: Send + 'static> IteratedResource<T> {
    /// Expose `index` as the full sequence.
    pub fn new(index: impl Streamer<T> + 'static) -> Self {
        Self {
            index: Arc::new(index),
        }
    }

    /// Expose an already shared index as the full sequence.
    pub fn from_shared(index: Arc<dyn Streamer<T>>) -> Self {
        Self { index }
    }

    /// Every index record, lazily.
    #[must_use]
    pub fn stream(&self) -> ItemStream<T> {
        self.index.stream()
    }

    /// Every index record's id, lazily.
    pub fn ids<K>(&self, key: K) -> ItemStream<Id>
    where
        K: Fn(&T) -> Id + Send + 'static,
    {
        ids_streamed(self.index.stream(), key)
    }

    /// Expand every index record through a bulk detail endpoint.
    ///
    /// Ids are taken from the index as it streams and grouped by `batcher`;
    /// `(id, detail)` pairs are yielded as each group settles.
    pub fn batch_details<V, KI, F, Fut, KV>(
        &self,
        batcher: &Batcher,
        id_of: KI,
        fetch_group: F,
        key: KV,
    ) -> ItemStream<(Id, V)>
    where
        KI: Fn(&T) -> Id + Send + 'static,
        V: Send + 'static,
        F: Fn(Vec<Id>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<V>, EsiError>> + Send + 'static,
        KV: Fn(&V) -> Id + Send + Sync + 'static,
    {
        batcher.fetch_stream_from(self.ids(id_of), fetch_group, key)
    }

    /// Expand every index record through a per-id detail fetch, at most
    /// `concurrency` at a time. Pairs are yielded as fetches complete.
    ///
    /// `NotFound` for an id skips it; any other failure is yielded and ends
    /// the sequence. An index failure stops new fetches, lets those in
    /// flight finish, and is yielded after them.
    pub fn each<V, KI, F, Fut>(&self, concurrency: usize, id_of: KI, fetch: F) -> ItemStream<(Id, V)>
    where
        KI: Fn(&T) -> Id + Send + 'static,
        V: Send + 'static,
        F: Fn(Id) -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, EsiError>> + Send + 'static,
    {
        let (ids, failure) = split_failure(self.ids(id_of));
        let pairs = ids
            .map(move |id| {
                let fut = fetch(id);
                async move {
                    match fut.await {
                        Ok(v) => Ok(Some((id, v))),
                        Err(e) if e.is_not_found() => Ok(None),
                        Err(e) => Err(e),
                    }
                }
            })
            .buffer_unordered(concurrency.max(1))
            .try_filter_map(futures::future::ok)
            .chain(failure.into_stream());
        end_on_error(pairs)
    }
}
