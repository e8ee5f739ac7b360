//! Record store layer for cinelog.
//!
//! Persistence is a set of typed collections, one per entity, each backed by
//! a JSON-lines file under the configured data directory. Collections offer
//! the full record-store contract (create / get / list / update / delete)
//! and guarantee the collection file is rewritten before any mutating call
//! returns. There is no multi-record atomicity; callers sequence dependent
//! writes.
//!
//! Typed repositories wrap the collections and expose entity-specific
//! finders and mutations to the service layer.

pub mod records;
pub mod repositories;
pub mod storage;

pub use storage::{Collection, Record, Store};
