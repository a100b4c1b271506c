use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use futures::{FutureExt, StreamExt, stream};

use super::{FetchFuture, ItemStream, Streamer};
use esi_types::EsiError;

type PageFetch<T> = Arc<dyn Fn(u32) -> FetchFuture<T> + Send + Sync>;

/// Streamer over page-numbered endpoints.
///
/// Pages are requested as 1, 2, 3, ... A page shorter than `page_size`
/// (including an empty one) ends the sequence, so a result count that is an
/// exact multiple of the page size costs one extra, empty fetch.
pub struct PageStreamer<T> {
    page_size: usize,
    fetch: PageFetch<T>,
}

impl<T> Clone for PageStreamer<T> {
    fn clone(&self) -> Self {
        Self {
            page_size: self.page_size,
            fetch: Arc::clone(&self.fetch),
        }
    }
}

impl<T: Send + 'static> PageStreamer<T> {
    /// Build a page streamer from a `page -> items` fetch function.
    ///
    /// A `page_size` of zero is treated as one.
    pub fn new<F, Fut>(page_size: usize, fetch: F) -> Self
    where
        F: Fn(u32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, EsiError>> + Send + 'static,
    {
        Self {
            page_size: page_size.max(1),
            fetch: Arc::new(move |page| fetch(page).boxed()),
        }
    }

    /// Expected number of items on a full page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }
}

struct PageState<T> {
    fetch: PageFetch<T>,
    page_size: usize,
    next_page: u32,
    exhausted: bool,
    buffer: VecDeque<T>,
}

impl<T: Send + 'static> Streamer<T> for PageStreamer<T> {
    fn stream(&self) -> ItemStream<T> {
        let state = PageState {
            fetch: Arc::clone(&self.fetch),
            page_size: self.page_size,
            next_page: 1,
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
                let page = st.next_page;
                match (st.fetch)(page).await {
                    Ok(items) => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(page, items = items.len(), page_size = st.page_size, "fetched page");
                        st.exhausted = items.len() < st.page_size;
                        st.next_page = page.saturating_add(1);
                        st.buffer.extend(items);
                    }
                    Err(e) => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(page, error = %e, "page fetch failed");
                        st.exhausted = true;
                        return Some((Err(e), st));
                    }
                }
            }
        })
        .boxed()
    }
}
