use std::future::Future;
use std::sync::Arc;

use futures::{FutureExt, StreamExt, future, stream};

use super::{FetchFuture, ItemStream, Streamer};
use esi_types::EsiError;

type ArrayFetch<T> = Arc<dyn Fn() -> FetchFuture<T> + Send + Sync>;

/// Streamer over a single, non-paginated bulk call.
///
/// Gives endpoints that return one complete array the same consumption
/// contract as the paginated ones: one fetch on first pull, then every item.
pub struct ArrayStreamer<T> {
    fetch: ArrayFetch<T>,
}

impl<T> Clone for ArrayStreamer<T> {
    fn clone(&self) -> Self {
        Self {
            fetch: Arc::clone(&self.fetch),
        }
    }
}

impl<T: Send + 'static> ArrayStreamer<T> {
    /// Build an array streamer from a zero-argument fetch function.
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, EsiError>> + Send + 'static,
    {
        Self {
            fetch: Arc::new(move || fetch().boxed()),
        }
    }
}

impl<T: Send + 'static> Streamer<T> for ArrayStreamer<T> {
    fn stream(&self) -> ItemStream<T> {
        let fetch = Arc::clone(&self.fetch);
        stream::once(async move { fetch().await })
            .map(|res| match res {
                Ok(items) => stream::iter(items).map(Ok::<T, EsiError>).left_stream(),
                Err(e) => stream::once(future::ready(Err(e))).right_stream(),
            })
            .flatten()
            .boxed()
    }
}
