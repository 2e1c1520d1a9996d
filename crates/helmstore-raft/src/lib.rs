//! Raft storage adapter for Helmstore
//!
//! Implements the two persistence surfaces a Raft engine needs —
//! `StableStore` (term, vote, arbitrary metadata) and `LogStore`
//! (indexed, range-deletable log entries) — over any ordered
//! `helmstore_core::Datastore`.
//!
//! # Architecture
//!
//! Raft expects two independent namespaces; the datastore exposes one
//! flat ordered key space.
//!
//! The bridge works as follows:
//! - Stable keys are stored as `b"s" || key`
//! - Log entries are stored as `b"l" || big_endian(index)`, so
//!   byte-lexicographic key order equals numeric index order
//! - First/last index come from keys-only scans, ascending or
//!   descending, taking the single leading key
//! - Batched writes and range deletes go through a datastore
//!   transaction when the backend advertises one, and fall back to
//!   sequential direct operations otherwise

pub mod codec;
pub mod error;
pub mod keys;
pub mod record;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use record::{LogRecord, RecordKind};
pub use store::{Atomicity, LogStore, RaftStore, StableStore};
