//! Domain modules.
//!
//! Each module owns its route ids and record types and assembles them from
//! the `esi-core` adapters. Accessors hang off [`Esi`](crate::Esi).

/// Characters, their affiliations and their corporation.
pub mod character;
/// Corporations and their starbases.
pub mod corporation;
/// Killmails: recent links and full records.
pub mod killmails;
/// One entry point for the one / many / all access shapes.
pub mod scope;
/// Bulk name resolution and solar systems.
pub mod universe;

use std::sync::Arc;

use esi_core::{EsiError, Id, IdHandle};
use tokio::sync::OnceCell;

/// An id handle resolved at most once for the adapter that owns it.
///
/// Page streamers call their fetch function once per page; pinning the
/// owner's id keeps every page of one index on the same id even when the
/// handle is dynamic.
#[derive(Debug, Clone)]
pub(crate) struct PinnedId {
    handle: IdHandle,
    cell: Arc<OnceCell<Id>>,
}

impl PinnedId {
    pub(crate) fn new(handle: IdHandle) -> Self {
        Self {
            handle,
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub(crate) async fn get(&self) -> Result<Id, EsiError> {
        self.cell
            .get_or_try_init(|| self.handle.resolve())
            .await
            .copied()
    }
}
