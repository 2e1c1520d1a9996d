//! Helmstore Core — Ordered Key-Value Datastore Abstraction
//!
//! A small contract for ordered key-value storage: point reads and
//! writes, prefix- and range-scoped ordered queries, and an optional
//! transaction capability for atomic multi-key mutations.
//!
//! # Architecture
//!
//! - **`Datastore`**: the required surface — get/put/delete, ordered
//!   `query`, close
//! - **`TxnDatastore`**: opt-in capability for backends that can batch
//!   mutations atomically
//! - **`MemDatastore`**: ordered in-memory engine implementing both,
//!   used as the reference backend in tests and benchmarks
//!
//! # No Consensus Dependencies
//!
//! This crate knows nothing about replicated logs, terms, or votes.
//! It can back any key-value workload that needs ordered scans.
//! Consensus-specific adapters live in separate crates (e.g.
//! helmstore-raft).

pub mod datastore;
pub mod error;
pub mod memory;
pub mod query;

// Re-export key types for convenience
pub use datastore::{Datastore, Txn, TxnDatastore};
pub use error::{HelmError, HelmResult};
pub use memory::MemDatastore;
pub use query::{Cursor, Entry, KeyRange, Order, Query};
