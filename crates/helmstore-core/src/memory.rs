//! Ordered in-memory datastore engine.
//!
//! MemDatastore keeps its working set in a `BTreeMap` behind a RwLock,
//! so ordered prefix and range scans come straight from the tree.
//!
//! **Read path**: shared read lock, multiple concurrent readers
//! **Write path**: exclusive write lock per mutation
//! **Transactions**: buffered ops, applied in order under one write
//! lock at commit
//!
//! Queries snapshot the matching region under the read lock and iterate
//! the snapshot afterwards. Cursor creation is O(matched entries), but
//! a live cursor never holds a lock and never observes later writes.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::datastore::{Datastore, Txn, TxnDatastore};
use crate::error::{HelmError, HelmResult};
use crate::query::{Cursor, Entry, Order, Query};

/// Ordered in-memory key-value engine.
///
/// All public methods take `&self` for concurrent access. Readers share
/// the RwLock; writers serialize through it. Contents are volatile —
/// nothing survives the process.
pub struct MemDatastore {
    /// Ordered working set — concurrent reads via RwLock
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    /// Set once by `close()`; all later operations fail
    closed: AtomicBool,
    /// Whether `transactions()` advertises the capability
    txn_capable: bool,
}

impl MemDatastore {
    /// Create an empty datastore with transaction support.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
            closed: AtomicBool::new(false),
            txn_capable: true,
        }
    }

    /// Create an empty datastore that hides the transaction capability.
    ///
    /// `transactions()` returns `None`, so callers that branch on the
    /// capability take their direct, non-atomic paths. Exists to
    /// exercise those paths without a second engine.
    pub fn non_transactional() -> Self {
        Self {
            txn_capable: false,
            ..Self::new()
        }
    }

    /// Number of key-value pairs stored.
    pub fn len(&self) -> usize {
        let data = self.data.read();
        data.len()
    }

    /// Returns true if the store has no entries.
    pub fn is_empty(&self) -> bool {
        let data = self.data.read();
        data.is_empty()
    }

    /// Check if key exists.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        let data = self.data.read();
        data.contains_key(key)
    }

    fn check_open(&self) -> HelmResult<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(HelmError::Closed)
        } else {
            Ok(())
        }
    }
}

impl Default for MemDatastore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemDatastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemDatastore")
            .field("entries", &self.len())
            .field("txn_capable", &self.txn_capable)
            .finish()
    }
}

impl Datastore for MemDatastore {
    fn get(&self, key: &[u8]) -> HelmResult<Option<Vec<u8>>> {
        self.check_open()?;
        let data = self.data.read();
        Ok(data.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> HelmResult<()> {
        self.check_open()?;
        let mut data = self.data.write();
        data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> HelmResult<()> {
        self.check_open()?;
        let mut data = self.data.write();
        data.remove(key);
        Ok(())
    }

    fn query(&self, query: Query) -> HelmResult<Cursor<'_>> {
        self.check_open()?;
        let entries = {
            let data = self.data.read();
            scan_map(&data, &query)
        };
        Ok(Box::new(entries.into_iter().map(Ok::<Entry, HelmError>)))
    }

    fn close(&self) -> HelmResult<()> {
        self.check_open()?;
        self.closed.store(true, Ordering::Release);
        tracing::debug!("memory datastore closed");
        Ok(())
    }

    fn transactions(&self) -> Option<&dyn TxnDatastore> {
        if self.txn_capable {
            Some(self)
        } else {
            None
        }
    }
}

impl TxnDatastore for MemDatastore {
    fn new_transaction(&self) -> HelmResult<Box<dyn Txn + '_>> {
        self.check_open()?;
        Ok(Box::new(MemTxn {
            store: self,
            ops: Vec::new(),
        }))
    }
}

/// A buffered operation inside a transaction. Order matters: ops replay
/// in the order they were issued.
enum TxnOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// Buffered-write transaction over a `MemDatastore`.
///
/// Reads merge the pending ops over the base store. Commit replays the
/// ops under a single write lock, so other readers see either none or
/// all of the batch.
struct MemTxn<'a> {
    store: &'a MemDatastore,
    ops: Vec<TxnOp>,
}

impl Txn for MemTxn<'_> {
    fn get(&self, key: &[u8]) -> HelmResult<Option<Vec<u8>>> {
        self.store.check_open()?;
        // Most recent pending op for the key wins
        for op in self.ops.iter().rev() {
            match op {
                TxnOp::Put { key: k, value } if k == key => return Ok(Some(value.clone())),
                TxnOp::Delete { key: k } if k == key => return Ok(None),
                _ => {}
            }
        }
        let data = self.store.data.read();
        Ok(data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> HelmResult<()> {
        self.store.check_open()?;
        self.ops.push(TxnOp::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        });
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> HelmResult<()> {
        self.store.check_open()?;
        self.ops.push(TxnOp::Delete { key: key.to_vec() });
        Ok(())
    }

    fn query(&self, query: Query) -> HelmResult<Cursor<'_>> {
        self.store.check_open()?;
        let mut view = {
            let data = self.store.data.read();
            data.clone()
        };
        for op in &self.ops {
            match op {
                TxnOp::Put { key, value } => {
                    view.insert(key.clone(), value.clone());
                }
                TxnOp::Delete { key } => {
                    view.remove(key);
                }
            }
        }
        let entries = scan_map(&view, &query);
        Ok(Box::new(entries.into_iter().map(Ok::<Entry, HelmError>)))
    }

    fn commit(self: Box<Self>) -> HelmResult<()> {
        let MemTxn { store, ops } = *self;
        store.check_open()?;
        let mut data = store.data.write();
        for op in ops {
            match op {
                TxnOp::Put { key, value } => {
                    data.insert(key, value);
                }
                TxnOp::Delete { key } => {
                    data.remove(&key);
                }
            }
        }
        tracing::debug!("memory transaction committed");
        Ok(())
    }

    fn discard(self: Box<Self>) {
        // Ops were never applied; dropping the buffer is the rollback
    }
}

/// Smallest key strictly greater than every key starting with `key`.
///
/// `None` means there is no such key (empty input, or all bytes 0xFF)
/// and the scan is unbounded above.
fn key_successor(key: &[u8]) -> Option<Vec<u8>> {
    let mut out = key.to_vec();
    while let Some(last) = out.last_mut() {
        if *last < 0xFF {
            *last += 1;
            return Some(out);
        }
        out.pop();
    }
    None
}

/// Resolve a query to effective bounds: inclusive lower, optional
/// exclusive upper. `None` means the resolved range is empty.
fn query_bounds(query: &Query) -> Option<(Vec<u8>, Option<Vec<u8>>)> {
    // The prefix itself is the smallest key carrying the prefix
    let lower = match &query.range.start {
        Some(start) if *start > query.prefix => start.clone(),
        _ => query.prefix.clone(),
    };
    let prefix_end = if query.prefix.is_empty() {
        None
    } else {
        key_successor(&query.prefix)
    };
    let upper = match (prefix_end, &query.range.end) {
        (Some(p), Some(r)) => Some(p.min(r.clone())),
        (Some(p), None) => Some(p),
        (None, Some(r)) => Some(r.clone()),
        (None, None) => None,
    };
    if let Some(u) = &upper {
        if *u <= lower {
            return None;
        }
    }
    Some((lower, upper))
}

/// Scan a map per the query descriptor: bounds, order, keys-only,
/// limit.
fn scan_map(map: &BTreeMap<Vec<u8>, Vec<u8>>, query: &Query) -> Vec<Entry> {
    let Some((lower, upper)) = query_bounds(query) else {
        return Vec::new();
    };
    let upper_bound = match upper {
        Some(u) => Bound::Excluded(u),
        None => Bound::Unbounded,
    };
    let range = map.range((Bound::Included(lower), upper_bound));
    let to_entry = |(k, v): (&Vec<u8>, &Vec<u8>)| Entry {
        key: k.clone(),
        value: if query.keys_only { Vec::new() } else { v.clone() },
    };
    let iter: Box<dyn Iterator<Item = Entry>> = match query.order {
        Order::Ascending => Box::new(range.map(to_entry)),
        Order::Descending => Box::new(range.rev().map(to_entry)),
    };
    match query.limit {
        Some(limit) => iter.take(limit).collect(),
        None => iter.collect(),
    }
}
