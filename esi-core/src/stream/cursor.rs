use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use futures::{FutureExt, StreamExt, stream};

use super::{FetchFuture, ItemStream, Streamer};
use esi_types::{EsiError, Id};

type CursorFetch<T> = Arc<dyn Fn(Option<Id>) -> FetchFuture<T> + Send + Sync>;
type KeyFn<T> = Arc<dyn Fn(&T) -> Id + Send + Sync>;

/// Which way the cursor walks the key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorDirection {
    /// Newest first: the next boundary is the smallest key of the last batch.
    #[default]
    Descending,
    /// Oldest first: the next boundary is the largest key of the last batch.
    Ascending,
}

impl CursorDirection {
    /// Whether `key` lies strictly past `boundary` in this direction.
    #[must_use]
    pub const fn is_beyond(self, key: Id, boundary: Id) -> bool {
        match self {
            Self::Descending => key < boundary,
            Self::Ascending => key > boundary,
        }
    }

    fn extremal(self, keys: impl Iterator<Item = Id>) -> Option<Id> {
        match self {
            Self::Descending => keys.min(),
            Self::Ascending => keys.max(),
        }
    }
}

/// Streamer over keyset ("from id") paginated endpoints.
///
/// The first fetch passes no boundary. Each following fetch passes the
/// extremal key of the previous batch. A batch shorter than `batch_size` ends
/// the sequence. Records that are not strictly beyond the boundary they were
/// fetched with are dropped, and a full batch that makes no progress ends the
/// sequence instead of requesting the same boundary again.
pub struct CursorStreamer<T> {
    batch_size: usize,
    direction: CursorDirection,
    key: KeyFn<T>,
    fetch: CursorFetch<T>,
}

impl<T> Clone for CursorStreamer<T> {
    fn clone(&self) -> Self {
        Self {
            batch_size: self.batch_size,
            direction: self.direction,
            key: Arc::clone(&self.key),
            fetch: Arc::clone(&self.fetch),
        }
    }
}

impl<T: Send + 'static> CursorStreamer<T> {
    /// Build a cursor streamer from a `boundary -> items` fetch function and
    /// the key extractor used to pick the next boundary.
    ///
    /// A `batch_size` of zero is treated as one.
    pub fn new<F, Fut, K>(batch_size: usize, direction: CursorDirection, key: K, fetch: F) -> Self
    where
        F: Fn(Option<Id>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, EsiError>> + Send + 'static,
        K: Fn(&T) -> Id + Send + Sync + 'static,
    {
        Self {
            batch_size: batch_size.max(1),
            direction,
            key: Arc::new(key),
            fetch: Arc::new(move |boundary| fetch(boundary).boxed()),
        }
    }

    /// Expected number of records in a full batch.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Direction the cursor walks.
    #[must_use]
    pub const fn direction(&self) -> CursorDirection {
        self.direction
    }
}

struct CursorState<T> {
    fetch: CursorFetch<T>,
    key: KeyFn<T>,
    batch_size: usize,
    direction: CursorDirection,
    boundary: Option<Id>,
    exhausted: bool,
    buffer: VecDeque<T>,
}

impl<T: Send + 'static> CursorState<T> {
    fn absorb(&mut self, mut items: Vec<T>) {
        let full = items.len() >= self.batch_size;
        if let Some(b) = self.boundary {
            let (key, direction) = (&self.key, self.direction);
            items.retain(|item| direction.is_beyond(key(item), b));
        }

        let next = self.direction.extremal(items.iter().map(|i| (self.key)(i)));
        match next {
            Some(n) if full => self.boundary = Some(n),
            Some(_) => self.exhausted = true,
            None => {
                #[cfg(feature = "tracing")]
                if full {
                    tracing::warn!(boundary = ?self.boundary, "cursor made no progress on a full batch; stopping");
                }
                self.exhausted = true;
            }
        }
        self.buffer.extend(items);
    }
}

impl<T: Send + 'static> Streamer<T> for CursorStreamer<T> {
    fn stream(&self) -> ItemStream<T> {
        let state = CursorState {
            fetch: Arc::clone(&self.fetch),
            key: Arc::clone(&self.key),
            batch_size: self.batch_size,
            direction: self.direction,
            boundary: None,
            exhausted: false,
            buffer: VecDeque::new(),
        };

        stream::unfold(state, |mut st| async move {
            loop {
                if let Some(item) = st.buffer.pop_front() {
                    return Some((Ok(item), st));
                }
                if st.exhausted {
                    return None;
                }
                match (st.fetch)(st.boundary).await {
                    Ok(items) => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(boundary = ?st.boundary, items = items.len(), "fetched cursor batch");
                        st.absorb(items);
                    }
                    Err(e) => {
                        st.exhausted = true;
                        return Some((Err(e), st));
                    }
                }
            }
        })
        .boxed()
    }
}
