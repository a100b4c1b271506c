//! Per-id views over an index that is the only source of truth for them.
//!
//! Slices are scanned linearly. Streamed variants stop pulling as soon as
//! they are satisfied, so pages past the last match are never fetched.

use std::collections::{HashMap, HashSet};

use futures::{Stream, StreamExt, TryStreamExt};

use crate::stream::ItemStream;
use esi_types::{EsiError, Id};

fn missing(id: Id) -> EsiError {
    EsiError::not_found(format!("id {id}"))
}

/// First record whose key equals `id`.
///
/// # Errors
/// Returns `NotFound` when no record matches.
pub fn filter_one<T, K>(source: &[T], id: Id, key: K) -> Result<&T, EsiError>
where
    K: Fn(&T) -> Id,
{
    source
        .iter()
        .find(|item| key(item) == id)
        .ok_or_else(|| missing(id))
}

/// Records matching any of `ids`, keyed by id.
///
/// Requested ids without a record are absent from the map. The first record
/// wins when several share a key.
pub fn filter_many<T, K>(
    source: &[T],
    ids: impl IntoIterator<Item = Id>,
    key: K,
) -> HashMap<Id, &T>
where
    K: Fn(&T) -> Id,
{
    let wanted: HashSet<Id> = ids.into_iter().collect();
    let mut out = HashMap::with_capacity(wanted.len());
    for item in source {
        if out.len() == wanted.len() {
            break;
        }
        let k = key(item);
        if wanted.contains(&k) {
            out.entry(k).or_insert(item);
        }
    }
    out
}

/// Every record's id, in source order.
pub fn ids<T, K>(source: &[T], key: K) -> Vec<Id>
where
    K: Fn(&T) -> Id,
{
    source.iter().map(key).collect()
}

/// Consume `source` until a record with key `id` appears.
///
/// # Errors
/// Returns `NotFound` when the sequence ends without a match, or the first
/// fetch failure encountered before the match.
pub async fn filter_one_streamed<T, S, K>(source: S, id: Id, key: K) -> Result<T, EsiError>
where
    S: Stream<Item = Result<T, EsiError>>,
    K: Fn(&T) -> Id,
{
    let mut source = std::pin::pin!(source);
    while let Some(item) = source.next().await {
        let item = item?;
        if key(&item) == id {
            return Ok(item);
        }
    }
    Err(missing(id))
}

/// Consume `source` until every id in `ids` has matched or it ends.
///
/// An empty id set returns immediately without pulling anything.
///
/// # Errors
/// Returns the first fetch failure encountered before all ids matched.
pub async fn filter_many_streamed<T, S, K>(
    source: S,
    ids: impl IntoIterator<Item = Id>,
    key: K,
) -> Result<HashMap<Id, T>, EsiError>
where
    S: Stream<Item = Result<T, EsiError>>,
    K: Fn(&T) -> Id,
{
    let wanted: HashSet<Id> = ids.into_iter().collect();
    let mut out = HashMap::with_capacity(wanted.len());
    let mut source = std::pin::pin!(source);
    while out.len() < wanted.len() {
        let Some(item) = source.next().await else {
            break;
        };
        let item = item?;
        let k = key(&item);
        if wanted.contains(&k) {
            out.entry(k).or_insert(item);
        }
    }
    Ok(out)
}

/// Map a record stream to its ids.
pub fn ids_streamed<T, K>(source: ItemStream<T>, key: K) -> ItemStream<Id>
where
    T: Send + 'static,
    K: Fn(&T) -> Id + Send + 'static,
{
    source.map_ok(move |item| key(&item)).boxed()
}
