//! Every streamer hands out the same consumption contract: a boxed
//! [`ItemStream`] that fetches on demand, one page or cursor step at a time,
//! and never ahead of what the consumer has pulled. A failed fetch is yielded
//! as an `Err` item and ends the sequence; nothing here retries.

use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{self, BoxFuture};
use futures::stream::{self, BoxStream, Stream, StreamExt};

use esi_types::EsiError;

mod array;
mod cursor;
mod memo;
mod page;

pub use array::ArrayStreamer;
pub use cursor::{CursorDirection, CursorStreamer};
pub use memo::Memoized;
pub use page::PageStreamer;

/// A lazy, finite, forward-only sequence of remote records.
///
/// Consumers must be prepared for an `Err` after some items were yielded.
pub type ItemStream<T> = BoxStream<'static, Result<T, EsiError>>;

/// Boxed future produced by fetch callbacks.
pub type FetchFuture<T> = BoxFuture<'static, Result<Vec<T>, EsiError>>;

/// A factory for lazy sequences over one remote source.
///
/// Each call to [`stream`](Streamer::stream) starts a fresh traversal.
pub trait Streamer<T>: Send + Sync {
    /// Start a new traversal of the source.
    fn stream(&self) -> ItemStream<T>;
}

impl<T, S> Streamer<T> for Arc<S>
where
    S: Streamer<T> + ?Sized,
{
    fn stream(&self) -> ItemStream<T> {
        (**self).stream()
    }
}

/// Box a fallible stream so that it ends right after its first `Err`.
///
/// Combinators such as `buffer_unordered` keep polling after a failure;
/// this restores the "failure ends the sequence" contract for their output.
pub fn end_on_error<T, S>(source: S) -> ItemStream<T>
where
    T: Send + 'static,
    S: Stream<Item = Result<T, EsiError>> + Send + 'static,
{
    source
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }
            *failed = item.is_err();
            future::ready(Some(item))
        })
        .boxed()
}

/// The failure that ended a source split by [`split_failure`], if any.
#[derive(Clone, Default)]
pub struct SourceFailure(Arc<Mutex<Option<EsiError>>>);

impl SourceFailure {
    fn record(&self, err: EsiError) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(err);
    }

    fn take(&self) -> Option<EsiError> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// A stream that yields the recorded failure once, checked when first
    /// polled. Chain it after the work fed by the split source.
    #[must_use]
    pub fn into_stream<U: Send + 'static>(self) -> ItemStream<U> {
        stream::once(async move { self.take() })
            .filter_map(|err| future::ready(err.map(Err)))
            .boxed()
    }
}

/// Separate a fallible source into its items and its failure.
///
/// The item stream ends at the first `Err`, which is kept in the returned
/// [`SourceFailure`]. Buffered work fed by the items then drains before the
/// failure is reported, so records produced ahead of it are not lost.
pub fn split_failure<T, S>(source: S) -> (BoxStream<'static, T>, SourceFailure)
where
    T: Send + 'static,
    S: Stream<Item = Result<T, EsiError>> + Send + 'static,
{
    let failure = SourceFailure::default();
    let slot = failure.clone();
    let items = source
        .scan((), move |_, item| {
            future::ready(match item {
                Ok(v) => Some(v),
                Err(e) => {
                    slot.record(e);
                    None
                }
            })
        })
        .boxed();
    (items, failure)
}
