//! Datastore contracts: `Datastore`, `TxnDatastore`, and `Txn`.
//!
//! `Datastore` is the required surface every backend provides.
//! Transactions are an opt-in capability: a backend that can batch
//! mutations atomically advertises it through `transactions()`, which
//! defaults to `None`. Callers probe the capability once and branch on
//! the result rather than inspecting concrete types.

use crate::error::HelmResult;
use crate::query::{Cursor, Query};

/// An ordered key-value datastore.
///
/// All methods take `&self`; implementations are responsible for their
/// own internal synchronization. Concurrent callers get whatever
/// isolation the backend itself provides.
pub trait Datastore: Send + Sync {
    /// Get the value stored under `key`. A missing key is `Ok(None)`,
    /// not an error.
    fn get(&self, key: &[u8]) -> HelmResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, overwriting any existing value.
    fn put(&self, key: &[u8], value: &[u8]) -> HelmResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &[u8]) -> HelmResult<()>;

    /// Run an ordered scan. The returned cursor releases the scan when
    /// dropped.
    fn query(&self, query: Query) -> HelmResult<Cursor<'_>>;

    /// Release the datastore. Behavior of further calls after close is
    /// backend-defined; they may fail.
    fn close(&self) -> HelmResult<()>;

    /// Transaction capability probe. Backends that support atomic
    /// multi-key mutations return `Some(self)`.
    fn transactions(&self) -> Option<&dyn TxnDatastore> {
        None
    }
}

/// Capability trait for backends that support transactions.
pub trait TxnDatastore: Datastore {
    /// Open a new transaction. Each transaction is independent; there
    /// is no cross-transaction coordination.
    fn new_transaction(&self) -> HelmResult<Box<dyn Txn + '_>>;
}

/// An open transaction.
///
/// Writes are not visible to other readers until `commit`. Dropping a
/// transaction without committing discards its pending writes.
pub trait Txn {
    /// Read through the transaction. Observes the transaction's own
    /// pending writes ahead of the base datastore.
    fn get(&self, key: &[u8]) -> HelmResult<Option<Vec<u8>>>;

    /// Buffer a put.
    fn put(&mut self, key: &[u8], value: &[u8]) -> HelmResult<()>;

    /// Buffer a delete.
    fn delete(&mut self, key: &[u8]) -> HelmResult<()>;

    /// Ordered scan over the merged view: base datastore plus pending
    /// writes.
    fn query(&self, query: Query) -> HelmResult<Cursor<'_>>;

    /// Atomically apply all buffered mutations.
    fn commit(self: Box<Self>) -> HelmResult<()>;

    /// Drop all buffered mutations without applying them.
    fn discard(self: Box<Self>);
}
