//! `StableStore` and `LogStore` implemented over a datastore.
//!
//! `RaftStore` is a pure mapping layer: it keeps no cache, holds no
//! locks of its own, and performs no background work. Every call is a
//! blocking call into the backing datastore, and concurrent callers
//! get exactly the isolation the datastore itself provides.

use helmstore_core::{Datastore, KeyRange, Order, Query, Txn, TxnDatastore};

use crate::codec;
use crate::error::{display_key, StoreError, StoreResult};
use crate::keys;
use crate::record::LogRecord;

/// Durable metadata store consumed by a Raft engine (term, vote).
pub trait StableStore {
    /// Store `value` under `key`, overwriting any existing value.
    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Fetch the value under `key`. A missing key is
    /// `StoreError::NotFound`, never an empty value.
    fn get(&self, key: &[u8]) -> StoreResult<Vec<u8>>;

    /// `set` with a fixed-width big-endian integer value.
    fn set_u64(&self, key: &[u8], value: u64) -> StoreResult<()>;

    /// `get` decoded as a fixed-width big-endian integer.
    fn get_u64(&self, key: &[u8]) -> StoreResult<u64>;
}

/// Indexed log store consumed by a Raft engine.
pub trait LogStore {
    /// Smallest stored log index, or 0 when the log is empty.
    fn first_index(&self) -> StoreResult<u64>;

    /// Largest stored log index, or 0 when the log is empty.
    fn last_index(&self) -> StoreResult<u64>;

    /// Fetch the record stored at `index`; `StoreError::LogNotFound`
    /// when absent.
    fn get_log(&self, index: u64) -> StoreResult<LogRecord>;

    /// Persist a single record. Equivalent to `store_logs` with a
    /// one-element batch.
    fn store_log(&self, record: &LogRecord) -> StoreResult<()>;

    /// Persist a batch of records as one logical unit, in the order
    /// supplied. All-or-nothing when the backend supports
    /// transactions; sequential (and partial on failure) otherwise.
    fn store_logs(&self, records: &[LogRecord]) -> StoreResult<()>;

    /// Delete every record with index in `[min, max]` inclusive.
    fn delete_range(&self, min: u64, max: u64) -> StoreResult<()>;
}

/// Write-path execution mode, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Atomicity {
    /// Batches and range deletes run inside datastore transactions
    Transactional,
    /// Mutations are issued directly; a mid-batch failure leaves a
    /// partial result
    Direct,
}

/// Raft stable + log storage over any ordered datastore.
///
/// The transaction capability is probed once here and the resulting
/// mode cached for the lifetime of the store — call sites branch on
/// the mode, they never re-inspect the backend.
pub struct RaftStore<D: Datastore> {
    ds: D,
    atomicity: Atomicity,
}

impl<D: Datastore> RaftStore<D> {
    /// Wrap a datastore, probing its transaction capability.
    pub fn new(ds: D) -> Self {
        let atomicity = if ds.transactions().is_some() {
            Atomicity::Transactional
        } else {
            Atomicity::Direct
        };
        tracing::debug!(?atomicity, "raft store opened");
        Self { ds, atomicity }
    }

    /// The write-path mode selected at construction.
    pub fn atomicity(&self) -> Atomicity {
        self.atomicity
    }

    /// The backing datastore.
    pub fn datastore(&self) -> &D {
        &self.ds
    }

    /// Release the backing datastore. Calls after close may fail;
    /// idempotency is not guaranteed.
    pub fn close(&self) -> StoreResult<()> {
        self.ds.close()?;
        Ok(())
    }

    fn txn_provider(&self) -> Option<&dyn TxnDatastore> {
        match self.atomicity {
            Atomicity::Transactional => self.ds.transactions(),
            Atomicity::Direct => None,
        }
    }

    /// Keys-only scan over the log namespace taking the single leading
    /// key: ascending for the first index, descending for the last.
    fn edge_index(&self, order: Order) -> StoreResult<u64> {
        let mut cursor = self.ds.query(Query {
            prefix: keys::LOG_PREFIX.to_vec(),
            keys_only: true,
            order,
            limit: Some(1),
            ..Default::default()
        })?;
        match cursor.next() {
            // Empty log namespace: 0 is the reserved sentinel
            None => Ok(0),
            Some(entry) => keys::index_from_key(&entry?.key),
        }
    }
}

impl<D: Datastore> std::fmt::Debug for RaftStore<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaftStore")
            .field("atomicity", &self.atomicity)
            .finish()
    }
}

impl<D: Datastore> StableStore for RaftStore<D> {
    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.ds.put(&keys::stable_key(key), value)?;
        Ok(())
    }

    fn get(&self, key: &[u8]) -> StoreResult<Vec<u8>> {
        match self.ds.get(&keys::stable_key(key))? {
            Some(value) => Ok(value),
            None => Err(StoreError::NotFound {
                key: display_key(key),
            }),
        }
    }

    fn set_u64(&self, key: &[u8], value: u64) -> StoreResult<()> {
        self.set(key, &value.to_be_bytes())
    }

    fn get_u64(&self, key: &[u8]) -> StoreResult<u64> {
        let value = self.get(key)?;
        keys::u64_from_bytes(&value)
    }
}

impl<D: Datastore> LogStore for RaftStore<D> {
    fn first_index(&self) -> StoreResult<u64> {
        self.edge_index(Order::Ascending)
    }

    fn last_index(&self) -> StoreResult<u64> {
        self.edge_index(Order::Descending)
    }

    fn get_log(&self, index: u64) -> StoreResult<LogRecord> {
        match self.ds.get(&keys::log_key(index))? {
            Some(bytes) => codec::decode(&bytes),
            None => Err(StoreError::LogNotFound { index }),
        }
    }

    fn store_log(&self, record: &LogRecord) -> StoreResult<()> {
        self.store_logs(std::slice::from_ref(record))
    }

    fn store_logs(&self, records: &[LogRecord]) -> StoreResult<()> {
        match self.txn_provider() {
            Some(txns) => {
                let mut txn = txns.new_transaction()?;
                match write_records(txn.as_mut(), records) {
                    Ok(()) => {
                        txn.commit()?;
                        tracing::debug!(count = records.len(), "log batch committed");
                        Ok(())
                    }
                    Err(err) => {
                        // Discard so no partial batch becomes visible
                        txn.discard();
                        Err(err)
                    }
                }
            }
            None => {
                // Direct mode: a failure here leaves the writes that
                // already landed — the capability-dependent guarantee
                for record in records {
                    let bytes = codec::encode(record)?;
                    self.ds.put(&keys::log_key(record.index), &bytes)?;
                }
                Ok(())
            }
        }
    }

    fn delete_range(&self, min: u64, max: u64) -> StoreResult<()> {
        let query = Query {
            prefix: keys::LOG_PREFIX.to_vec(),
            range: KeyRange {
                start: Some(keys::log_key(min)),
                // The exclusive bound is log_key(max + 1); at u64::MAX
                // that would wrap, so the scan runs open-ended to the
                // end of the log namespace instead
                end: if max == u64::MAX {
                    None
                } else {
                    Some(keys::log_key(max + 1))
                },
            },
            keys_only: true,
            ..Default::default()
        };
        match self.txn_provider() {
            Some(txns) => {
                let mut txn = txns.new_transaction()?;
                let cursor = match self.ds.query(query) {
                    Ok(cursor) => cursor,
                    Err(err) => {
                        txn.discard();
                        return Err(err.into());
                    }
                };
                match delete_scanned(cursor, txn.as_mut()) {
                    Ok(deleted) => {
                        // The scan has fully drained; commit the batch
                        txn.commit()?;
                        tracing::debug!(min, max, deleted, "log range deleted");
                        Ok(())
                    }
                    Err(err) => {
                        txn.discard();
                        Err(err)
                    }
                }
            }
            None => {
                let cursor = self.ds.query(query)?;
                for entry in cursor {
                    self.ds.delete(&entry?.key)?;
                }
                Ok(())
            }
        }
    }
}

/// Encode and write a batch through a transaction, preserving order.
fn write_records(txn: &mut dyn Txn, records: &[LogRecord]) -> StoreResult<()> {
    for record in records {
        let bytes = codec::encode(record)?;
        txn.put(&keys::log_key(record.index), &bytes)?;
    }
    Ok(())
}

/// Drain the scan, deleting every yielded key through the transaction.
/// Consumes the cursor, so the scan is released before commit.
fn delete_scanned(cursor: helmstore_core::Cursor<'_>, txn: &mut dyn Txn) -> StoreResult<usize> {
    let mut deleted = 0;
    for entry in cursor {
        txn.delete(&entry?.key)?;
        deleted += 1;
    }
    Ok(deleted)
}
