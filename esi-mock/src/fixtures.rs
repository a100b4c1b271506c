//! Deterministic JSON records shaped like the remote service's payloads.

pub mod character;
pub mod corporation;
pub mod killmails;
pub mod universe;
