use std::collections::{BTreeSet, HashMap, HashSet};
use std::future::Future;

use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use futures::future;

use crate::stream::{ItemStream, end_on_error, split_failure};
use esi_types::{EsiError, Id};

/// Splits id sets into provider-sized groups and issues one request per group.
///
/// Bulk lookup endpoints reject bodies with more ids than their maximum, so
/// every call goes through [`partition`](Batcher::partition). Groups are
/// independent and dispatched with at most `concurrency` requests in flight.
///
/// Ids absent from a group's response are omitted from the result rather
/// than reported. Records whose key was not requested in their group are
/// ignored, and a key returned twice keeps its first record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batcher {
    max_batch_size: usize,
    concurrency: usize,
}

impl Batcher {
    /// Create a batcher. Zero values for either bound are treated as one.
    #[must_use]
    pub fn new(max_batch_size: usize, concurrency: usize) -> Self {
        Self {
            max_batch_size: max_batch_size.max(1),
            concurrency: concurrency.max(1),
        }
    }

    /// Maximum number of ids in a single request.
    #[must_use]
    pub const fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Maximum number of group requests in flight.
    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Partition ids into ascending, disjoint groups of at most
    /// `max_batch_size`. Duplicates are removed first.
    #[must_use]
    pub fn partition(&self, ids: impl IntoIterator<Item = Id>) -> Vec<Vec<Id>> {
        let unique: Vec<Id> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        unique
            .chunks(self.max_batch_size)
            .map(<[Id]>::to_vec)
            .collect()
    }

    /// Fetch every group and merge the results into one id-keyed map.
    ///
    /// All-or-nothing: the first failing group fails the whole batch and no
    /// partial map is returned.
    ///
    /// # Errors
    /// Returns the first group failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "esi::batch::fetch_map",
            skip_all,
            fields(max_batch_size = self.max_batch_size, concurrency = self.concurrency),
        )
    )]
    pub async fn fetch_map<V, F, Fut, K>(
        &self,
        ids: impl IntoIterator<Item = Id>,
        fetch_group: F,
        key: K,
    ) -> Result<HashMap<Id, V>, EsiError>
    where
        F: Fn(Vec<Id>) -> Fut,
        Fut: Future<Output = Result<Vec<V>, EsiError>>,
        K: Fn(&V) -> Id,
    {
        let groups = self.partition(ids);
        if groups.is_empty() {
            return Ok(HashMap::new());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(groups = groups.len(), "dispatching batch groups");

        let mut pending = stream::iter(groups.into_iter().map(|group| {
            let fut = fetch_group(group.clone());
            async move { fut.await.map(|items| (group, items)) }
        }))
        .buffer_unordered(self.concurrency);

        let mut out = HashMap::new();
        while let Some(res) = pending.next().await {
            let (group, items) = res?;
            merge_group(&mut out, group, items, &key);
        }
        Ok(out)
    }

    /// Lazy variant of [`fetch_map`](Batcher::fetch_map).
    ///
    /// Yields `(id, record)` pairs group by group, in the order the group
    /// requests settle, which need not match submission order. A failing
    /// group is yielded as an `Err` and ends the sequence; pairs yielded
    /// before it stay valid.
    pub fn fetch_stream<V, F, Fut, K>(
        &self,
        ids: impl IntoIterator<Item = Id>,
        fetch_group: F,
        key: K,
    ) -> ItemStream<(Id, V)>
    where
        V: Send + 'static,
        F: Fn(Vec<Id>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<V>, EsiError>> + Send + 'static,
        K: Fn(&V) -> Id + Send + Sync + 'static,
    {
        let groups = stream::iter(self.partition(ids));
        end_on_error(self.stream_groups(groups, fetch_group, key))
    }

    /// Like [`fetch_stream`](Batcher::fetch_stream), but the ids themselves
    /// arrive lazily, e.g. from an index streamer. Ids are grouped as they
    /// arrive, so the first group is dispatched before the id source ends.
    ///
    /// Duplicate ids are skipped. When the id source fails, the ids it
    /// produced before the failure are still dispatched, groups in flight
    /// settle, and the failure is yielded last.
    pub fn fetch_stream_from<S, V, F, Fut, K>(
        &self,
        ids: S,
        fetch_group: F,
        key: K,
    ) -> ItemStream<(Id, V)>
    where
        S: Stream<Item = Result<Id, EsiError>> + Send + 'static,
        V: Send + 'static,
        F: Fn(Vec<Id>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<V>, EsiError>> + Send + 'static,
        K: Fn(&V) -> Id + Send + Sync + 'static,
    {
        let (ids, failure) = split_failure(ids);
        let mut seen = HashSet::new();
        let groups = ids
            .filter(move |id| future::ready(seen.insert(*id)))
            .chunks(self.max_batch_size);
        end_on_error(
            self.stream_groups(groups, fetch_group, key)
                .chain(failure.into_stream()),
        )
    }

    fn stream_groups<S, V, F, Fut, K>(
        &self,
        groups: S,
        fetch_group: F,
        key: K,
    ) -> ItemStream<(Id, V)>
    where
        S: Stream<Item = Vec<Id>> + Send + 'static,
        V: Send + 'static,
        F: Fn(Vec<Id>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<V>, EsiError>> + Send + 'static,
        K: Fn(&V) -> Id + Send + Sync + 'static,
    {
        let key = std::sync::Arc::new(key);
        groups
            .map(move |group| {
                #[cfg(feature = "tracing")]
                tracing::debug!(size = group.len(), "dispatching batch group");
                let fut = fetch_group(group.clone());
                async move { fut.await.map(|items| (group, items)) }
            })
            .buffer_unordered(self.concurrency)
            .map_ok(move |(group, items)| {
                let key = std::sync::Arc::clone(&key);
                let mut wanted: HashSet<Id> = group.into_iter().collect();
                stream::iter(items.into_iter().filter_map(move |v| {
                    let k = key(&v);
                    wanted.remove(&k).then_some(Ok::<_, EsiError>((k, v)))
                }))
            })
            .try_flatten()
            .boxed()
    }
}

fn merge_group<V, K>(out: &mut HashMap<Id, V>, group: Vec<Id>, items: Vec<V>, key: &K)
where
    K: Fn(&V) -> Id,
{
    let wanted: HashSet<Id> = group.into_iter().collect();
    for item in items {
        let k = key(&item);
        if wanted.contains(&k) {
            out.entry(k).or_insert(item);
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!(id = k, "ignoring record for an id that was not requested");
        }
    }
}
