//! One entry point for the three access shapes.
//!
//! A domain resource that can be read for one id, a set of ids, or every id
//! implements [`Scoped`]. Callers either use the explicitly named
//! constructors (`for_one`, `for_many`, `for_all`) or hand a [`Scope`] to
//! [`Scoped::select`] and match on the resulting [`Selection`].

use std::collections::BTreeSet;

use esi_core::{Id, IdHandle, IdSetHandle};

/// Which ids an access is scoped to.
#[derive(Debug, Clone)]
pub enum Scope {
    /// Every record the source holds.
    All,
    /// A single, possibly lazily resolved, id.
    One(IdHandle),
    /// A set of ids, possibly lazily resolved.
    Many(IdSetHandle),
}

impl From<Id> for Scope {
    fn from(id: Id) -> Self {
        Self::One(IdHandle::Fixed(id))
    }
}

impl From<IdHandle> for Scope {
    fn from(h: IdHandle) -> Self {
        Self::One(h)
    }
}

impl From<IdSetHandle> for Scope {
    fn from(h: IdSetHandle) -> Self {
        Self::Many(h)
    }
}

impl From<Vec<Id>> for Scope {
    fn from(ids: Vec<Id>) -> Self {
        Self::Many(ids.into())
    }
}

impl From<BTreeSet<Id>> for Scope {
    fn from(ids: BTreeSet<Id>) -> Self {
        Self::Many(ids.into())
    }
}

/// The adapter chosen for a [`Scope`].
#[derive(Debug, Clone)]
pub enum Selection<S, M, I> {
    /// Built for [`Scope::One`].
    Single(S),
    /// Built for [`Scope::Many`].
    Mapped(M),
    /// Built for [`Scope::All`].
    Iterated(I),
}

impl<S, M, I> Selection<S, M, I> {
    /// The single-id adapter, if that was selected.
    pub fn single(self) -> Option<S> {
        match self {
            Self::Single(s) => Some(s),
            _ => None,
        }
    }

    /// The id-set adapter, if that was selected.
    pub fn mapped(self) -> Option<M> {
        match self {
            Self::Mapped(m) => Some(m),
            _ => None,
        }
    }

    /// The every-record adapter, if that was selected.
    pub fn iterated(self) -> Option<I> {
        match self {
            Self::Iterated(i) => Some(i),
            _ => None,
        }
    }
}

/// A resource readable for one id, many ids, or all of them.
pub trait Scoped {
    /// Adapter for one id.
    type One;
    /// Adapter for a set of ids.
    type Many;
    /// Adapter for every record.
    type All;

    /// Scope to one id.
    fn for_one(&self, id: impl Into<IdHandle>) -> Self::One;

    /// Scope to a set of ids.
    fn for_many(&self, ids: impl Into<IdSetHandle>) -> Self::Many;

    /// Scope to every record.
    fn for_all(&self) -> Self::All;

    /// Dispatch on a runtime scope.
    fn select(&self, scope: impl Into<Scope>) -> Selection<Self::One, Self::Many, Self::All> {
        match scope.into() {
            Scope::All => Selection::Iterated(self.for_all()),
            Scope::One(h) => Selection::Single(self.for_one(h)),
            Scope::Many(h) => Selection::Mapped(self.for_many(h)),
        }
    }
}
