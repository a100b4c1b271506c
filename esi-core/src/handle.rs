//! Id scopes bound to resource adapters.
//!
//! Some ids are only known after another request resolves (the corporation
//! of a character, the ids matching a search). The `Dynamic` variants carry a
//! resolver for those; it runs on every `resolve()` call and is never cached
//! here.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use esi_types::{EsiError, Id};

/// Resolver for a lazily discovered id.
pub type IdResolver = Arc<dyn Fn() -> BoxFuture<'static, Result<Id, EsiError>> + Send + Sync>;
/// Resolver for a lazily discovered id set.
pub type IdSetResolver =
    Arc<dyn Fn() -> BoxFuture<'static, Result<Vec<Id>, EsiError>> + Send + Sync>;

/// A single-id scope.
#[derive(Clone)]
pub enum IdHandle {
    /// Known up front.
    Fixed(Id),
    /// Discovered by running the resolver.
    Dynamic(IdResolver),
}

impl IdHandle {
    /// Build a dynamic handle from an async resolver.
    pub fn dynamic<F, Fut>(resolver: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Id, EsiError>> + Send + 'static,
    {
        Self::Dynamic(Arc::new(move || resolver().boxed()))
    }

    /// The id, if known without resolving.
    #[must_use]
    pub const fn fixed(&self) -> Option<Id> {
        match self {
            Self::Fixed(id) => Some(*id),
            Self::Dynamic(_) => None,
        }
    }

    /// Resolve the id, running the resolver for dynamic handles.
    ///
    /// # Errors
    /// Propagates the resolver's failure.
    pub async fn resolve(&self) -> Result<Id, EsiError> {
        match self {
            Self::Fixed(id) => Ok(*id),
            Self::Dynamic(resolver) => resolver().await,
        }
    }
}

impl From<Id> for IdHandle {
    fn from(id: Id) -> Self {
        Self::Fixed(id)
    }
}

impl fmt::Debug for IdHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(id) => f.debug_tuple("Fixed").field(id).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// A multi-id scope. Resolved sets are de-duplicated.
#[derive(Clone)]
pub enum IdSetHandle {
    /// Known up front.
    Fixed(BTreeSet<Id>),
    /// Discovered by running the resolver.
    Dynamic(IdSetResolver),
}

impl IdSetHandle {
    /// Build a dynamic handle from an async resolver.
    pub fn dynamic<F, Fut>(resolver: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Id>, EsiError>> + Send + 'static,
    {
        Self::Dynamic(Arc::new(move || resolver().boxed()))
    }

    /// Resolve the id set, running the resolver for dynamic handles.
    ///
    /// # Errors
    /// Propagates the resolver's failure.
    pub async fn resolve(&self) -> Result<BTreeSet<Id>, EsiError> {
        match self {
            Self::Fixed(ids) => Ok(ids.clone()),
            Self::Dynamic(resolver) => Ok(resolver().await?.into_iter().collect()),
        }
    }
}

impl FromIterator<Id> for IdSetHandle {
    fn from_iter<I: IntoIterator<Item = Id>>(iter: I) -> Self {
        Self::Fixed(iter.into_iter().collect())
    }
}

impl From<Vec<Id>> for IdSetHandle {
    fn from(ids: Vec<Id>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<&[Id]> for IdSetHandle {
    fn from(ids: &[Id]) -> Self {
        ids.iter().copied().collect()
    }
}

impl From<BTreeSet<Id>> for IdSetHandle {
    fn from(ids: BTreeSet<Id>) -> Self {
        Self::Fixed(ids)
    }
}

impl fmt::Debug for IdSetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(ids) => f.debug_tuple("Fixed").field(ids).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
