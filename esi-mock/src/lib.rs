//! esi-mock
//!
//! An in-memory [`Requester`](esi_core::Requester) for tests and examples.
//!
//! Routes are scripted through a [`MockController`]: fixed payloads, failures,
//! hangs, or one of the pagination conventions the resource core understands
//! (page numbers, keyset cursors, bulk id bodies, per-id lookups). Every call
//! is logged so tests can assert how many requests were issued and with which
//! parameters.

mod dynamic;
pub mod fixtures;

pub use dynamic::{MockBehavior, MockController, MockRequester, RecordedRequest};
