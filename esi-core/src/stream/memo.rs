use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::{StreamExt, stream};

use super::{ItemStream, Streamer};
use esi_types::EsiError;

/// Shares one traversal of a source between many consumers.
///
/// The first [`stream`](Streamer::stream) call starts the upstream traversal.
/// Every call returns its own cursor over a shared buffer: records already
/// fetched are replayed from memory, and the cursor that runs past the end
/// pulls the next upstream record for everyone. Each page is therefore
/// fetched at most once, and concurrent consumers each see the full
/// sequence instead of splitting it between them.
///
/// A failed upstream fetch is delivered to every cursor that reaches it.
/// The failed traversal is then retired, so the next `stream()` call starts
/// over from the beginning.
pub struct Memoized<T> {
    source: Arc<dyn Streamer<T>>,
    current: Mutex<Option<Arc<Shared<T>>>>,
}

struct Shared<T> {
    failed: AtomicBool,
    state: tokio::sync::Mutex<SharedState<T>>,
}

struct SharedState<T> {
    items: Vec<T>,
    upstream: Option<ItemStream<T>>,
    failure: Option<EsiError>,
}

impl<T> Shared<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new(upstream: ItemStream<T>) -> Self {
        Self {
            failed: AtomicBool::new(false),
            state: tokio::sync::Mutex::new(SharedState {
                items: Vec::new(),
                upstream: Some(upstream),
                failure: None,
            }),
        }
    }

    async fn get(&self, pos: usize) -> Option<Result<T, EsiError>> {
        let mut st = self.state.lock().await;
        if let Some(item) = st.items.get(pos) {
            return Some(Ok(item.clone()));
        }
        if let Some(e) = &st.failure {
            return Some(Err(e.clone()));
        }
        let upstream = st.upstream.as_mut()?;
        let next = upstream.next().await;
        match next {
            Some(Ok(item)) => {
                st.items.push(item.clone());
                Some(Ok(item))
            }
            Some(Err(e)) => {
                st.upstream = None;
                st.failure = Some(e.clone());
                self.failed.store(true, Ordering::Release);
                Some(Err(e))
            }
            None => {
                st.upstream = None;
                None
            }
        }
    }
}

impl<T> Memoized<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Wrap a source streamer.
    pub fn new(source: impl Streamer<T> + 'static) -> Self {
        Self::from_shared(Arc::new(source))
    }

    /// Wrap an already shared source streamer.
    pub fn from_shared(source: Arc<dyn Streamer<T>>) -> Self {
        Self {
            source,
            current: Mutex::new(None),
        }
    }

    /// Drop everything fetched so far; the next `stream()` starts a new traversal.
    ///
    /// Cursors handed out earlier keep reading the old traversal.
    pub fn reset(&self) {
        let mut slot = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    fn shared(&self) -> Arc<Shared<T>> {
        let mut slot = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(s) if !s.failed.load(Ordering::Acquire) => Arc::clone(s),
            _ => {
                let fresh = Arc::new(Shared::new(self.source.stream()));
                *slot = Some(Arc::clone(&fresh));
                fresh
            }
        }
    }
}

impl<T> Streamer<T> for Memoized<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn stream(&self) -> ItemStream<T> {
        let shared = self.shared();
        stream::unfold((shared, 0usize, false), |(shared, pos, done)| async move {
            if done {
                return None;
            }
            let next = shared.get(pos).await;
            match next {
                Some(Ok(item)) => Some((Ok(item), (shared, pos + 1, false))),
                Some(Err(e)) => Some((Err(e), (shared, pos, true))),
                None => None,
            }
        })
        .boxed()
    }
}
