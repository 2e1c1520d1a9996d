//! Integration tests: the full StableStore/LogStore surface over the
//! in-memory engine, in both transactional and direct modes, plus
//! fault injection for the atomicity guarantees.

use helmstore_core::{
    Cursor, Datastore, HelmError, HelmResult, MemDatastore, Query, Txn, TxnDatastore,
};
use helmstore_raft::{
    Atomicity, LogRecord, LogStore, RaftStore, RecordKind, StableStore, StoreError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_store() -> RaftStore<MemDatastore> {
    RaftStore::new(MemDatastore::new())
}

fn test_direct_store() -> RaftStore<MemDatastore> {
    RaftStore::new(MemDatastore::non_transactional())
}

fn test_record(index: u64, data: &str) -> LogRecord {
    LogRecord::command(index, data.as_bytes().to_vec())
}

/// Both contracts must be satisfied by one store value.
fn assert_raft_storage<S: StableStore + LogStore>(_store: &S) {}

// ---------------------------------------------------------------------------
// Fault injection: a datastore that fails puts on one specific key
// ---------------------------------------------------------------------------

struct FailingDatastore {
    inner: MemDatastore,
    fail_on: Vec<u8>,
    transactional: bool,
}

impl FailingDatastore {
    fn new(fail_on: Vec<u8>, transactional: bool) -> Self {
        Self {
            inner: if transactional {
                MemDatastore::new()
            } else {
                MemDatastore::non_transactional()
            },
            fail_on,
            transactional,
        }
    }

    fn injected(&self) -> HelmError {
        HelmError::Backend {
            message: "injected put failure".to_string(),
        }
    }
}

impl Datastore for FailingDatastore {
    fn get(&self, key: &[u8]) -> HelmResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> HelmResult<()> {
        if key == self.fail_on.as_slice() {
            return Err(self.injected());
        }
        self.inner.put(key, value)
    }

    fn delete(&self, key: &[u8]) -> HelmResult<()> {
        self.inner.delete(key)
    }

    fn query(&self, query: Query) -> HelmResult<Cursor<'_>> {
        self.inner.query(query)
    }

    fn close(&self) -> HelmResult<()> {
        self.inner.close()
    }

    fn transactions(&self) -> Option<&dyn TxnDatastore> {
        if self.transactional {
            Some(self)
        } else {
            None
        }
    }
}

impl TxnDatastore for FailingDatastore {
    fn new_transaction(&self) -> HelmResult<Box<dyn Txn + '_>> {
        let inner = self.inner.new_transaction()?;
        Ok(Box::new(FailingTxn {
            inner,
            fail_on: self.fail_on.clone(),
        }))
    }
}

struct FailingTxn<'a> {
    inner: Box<dyn Txn + 'a>,
    fail_on: Vec<u8>,
}

impl Txn for FailingTxn<'_> {
    fn get(&self, key: &[u8]) -> HelmResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> HelmResult<()> {
        if key == self.fail_on.as_slice() {
            return Err(HelmError::Backend {
                message: "injected put failure".to_string(),
            });
        }
        self.inner.put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> HelmResult<()> {
        self.inner.delete(key)
    }

    fn query(&self, query: Query) -> HelmResult<Cursor<'_>> {
        self.inner.query(query)
    }

    fn commit(self: Box<Self>) -> HelmResult<()> {
        self.inner.commit()
    }

    fn discard(self: Box<Self>) {
        self.inner.discard()
    }
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

#[test]
fn test_store_implements_both_contracts() {
    let store = test_store();
    assert_raft_storage(&store);
}

// ---------------------------------------------------------------------------
// First / last index
// ---------------------------------------------------------------------------

#[test]
fn test_first_index() {
    let store = test_store();

    // 0 on an empty log, with no error
    assert_eq!(store.first_index().unwrap(), 0);

    let logs = vec![
        test_record(1, "log1"),
        test_record(2, "log2"),
        test_record(3, "log3"),
    ];
    store.store_logs(&logs).unwrap();

    assert_eq!(store.first_index().unwrap(), 1);
}

#[test]
fn test_last_index() {
    let store = test_store();

    assert_eq!(store.last_index().unwrap(), 0);

    let logs = vec![
        test_record(1, "log1"),
        test_record(2, "log2"),
        test_record(3, "log3"),
    ];
    store.store_logs(&logs).unwrap();

    assert_eq!(store.last_index().unwrap(), 3);
}

#[test]
fn test_first_last_sparse_indices() {
    let store = test_store();
    // Indices need not be contiguous after external truncation
    store.store_logs(&[test_record(5, "a"), test_record(9, "b"), test_record(42, "c")])
        .unwrap();
    assert_eq!(store.first_index().unwrap(), 5);
    assert_eq!(store.last_index().unwrap(), 42);
}

#[test]
fn test_indices_ignore_stable_namespace() {
    let store = test_store();
    store.set(b"CurrentTerm", b"someval").unwrap();
    // Stable writes never leak into the log namespace scans
    assert_eq!(store.first_index().unwrap(), 0);
    assert_eq!(store.last_index().unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Get / store logs
// ---------------------------------------------------------------------------

#[test]
fn test_get_log_missing() {
    let store = test_store();
    match store.get_log(1) {
        Err(StoreError::LogNotFound { index: 1 }) => {}
        other => panic!("expected LogNotFound, got {:?}", other),
    }
}

#[test]
fn test_store_log_round_trip() {
    let store = test_store();
    let log = LogRecord {
        index: 1,
        term: 4,
        kind: RecordKind::Configuration,
        data: b"log1".to_vec(),
        extensions: vec![1, 2, 3],
    };
    store.store_log(&log).unwrap();

    let result = store.get_log(1).unwrap();
    assert_eq!(result, log);
}

#[test]
fn test_store_logs() {
    let store = test_store();
    let logs = vec![test_record(1, "log1"), test_record(2, "log2")];
    store.store_logs(&logs).unwrap();

    assert_eq!(store.get_log(1).unwrap(), logs[0]);
    assert_eq!(store.get_log(2).unwrap(), logs[1]);
}

#[test]
fn test_store_logs_direct_mode() {
    let store = test_direct_store();
    assert_eq!(store.atomicity(), Atomicity::Direct);

    let logs = vec![test_record(1, "log1"), test_record(2, "log2")];
    store.store_logs(&logs).unwrap();
    assert_eq!(store.get_log(1).unwrap(), logs[0]);
    assert_eq!(store.get_log(2).unwrap(), logs[1]);
}

#[test]
fn test_duplicate_index_in_batch_overwrites() {
    let store = test_store();
    store.store_logs(&[test_record(1, "first"), test_record(1, "second")])
        .unwrap();
    assert_eq!(store.get_log(1).unwrap().data, b"second".to_vec());
}

#[test]
fn test_restore_overwrites_index() {
    let store = test_store();
    store.store_log(&test_record(1, "old")).unwrap();
    store.store_log(&test_record(1, "new")).unwrap();
    assert_eq!(store.get_log(1).unwrap().data, b"new".to_vec());
}

// ---------------------------------------------------------------------------
// Atomicity
// ---------------------------------------------------------------------------

#[test]
fn test_store_logs_transactional_all_or_nothing() {
    // Fail the put of the last record in the batch
    let ds = FailingDatastore::new(failing_key(3), true);
    let store = RaftStore::new(ds);
    assert_eq!(store.atomicity(), Atomicity::Transactional);

    let logs = vec![
        test_record(1, "log1"),
        test_record(2, "log2"),
        test_record(3, "log3"),
    ];
    let err = store.store_logs(&logs).unwrap_err();
    assert!(matches!(err, StoreError::Datastore(_)));

    // None of the batch is visible
    assert_eq!(store.first_index().unwrap(), 0);
    assert!(matches!(
        store.get_log(1),
        Err(StoreError::LogNotFound { .. })
    ));
    assert!(matches!(
        store.get_log(2),
        Err(StoreError::LogNotFound { .. })
    ));
}

#[test]
fn test_store_logs_direct_partial_on_failure() {
    let ds = FailingDatastore::new(failing_key(3), false);
    let store = RaftStore::new(ds);
    assert_eq!(store.atomicity(), Atomicity::Direct);

    let logs = vec![
        test_record(1, "log1"),
        test_record(2, "log2"),
        test_record(3, "log3"),
    ];
    store.store_logs(&logs).unwrap_err();

    // Without transactions the prefix that landed stays visible
    assert_eq!(store.get_log(1).unwrap().data, b"log1".to_vec());
    assert_eq!(store.get_log(2).unwrap().data, b"log2".to_vec());
    assert!(matches!(
        store.get_log(3),
        Err(StoreError::LogNotFound { .. })
    ));
}

/// Physical log key for fault injection: must match the adapter's
/// encoding (`b"l"` plus big-endian index).
fn failing_key(index: u64) -> Vec<u8> {
    let mut key = b"l".to_vec();
    key.extend_from_slice(&index.to_be_bytes());
    key
}

// ---------------------------------------------------------------------------
// Range deletion
// ---------------------------------------------------------------------------

#[test]
fn test_delete_range() {
    let store = test_store();
    let logs = vec![
        test_record(1, "log1"),
        test_record(2, "log2"),
        test_record(3, "log3"),
    ];
    store.store_logs(&logs).unwrap();

    store.delete_range(1, 2).unwrap();

    assert!(matches!(
        store.get_log(1),
        Err(StoreError::LogNotFound { .. })
    ));
    assert!(matches!(
        store.get_log(2),
        Err(StoreError::LogNotFound { .. })
    ));
    assert_eq!(store.get_log(3).unwrap().data, b"log3".to_vec());
    assert_eq!(store.first_index().unwrap(), 3);
}

#[test]
fn test_delete_range_boundaries_survive() {
    let store = test_store();
    for i in 1..=5 {
        store.store_log(&test_record(i, "v")).unwrap();
    }

    store.delete_range(2, 4).unwrap();

    // Exactly [2, 4] removed; 1 and 5 untouched
    assert_eq!(store.get_log(1).unwrap().index, 1);
    assert_eq!(store.get_log(5).unwrap().index, 5);
    for i in 2..=4 {
        assert!(matches!(
            store.get_log(i),
            Err(StoreError::LogNotFound { .. })
        ));
    }
    assert_eq!(store.first_index().unwrap(), 1);
    assert_eq!(store.last_index().unwrap(), 5);
}

#[test]
fn test_delete_range_direct_mode() {
    let store = test_direct_store();
    for i in 1..=3 {
        store.store_log(&test_record(i, "v")).unwrap();
    }
    store.delete_range(1, 2).unwrap();
    assert_eq!(store.first_index().unwrap(), 3);
}

#[test]
fn test_delete_range_max_index_open_ended() {
    let store = test_store();
    store.store_log(&test_record(5, "keep")).unwrap();
    store.store_log(&test_record(u64::MAX, "top")).unwrap();
    store.set(b"meta", b"untouched").unwrap();

    // max + 1 must not wrap; the scan runs to the end of the log
    // namespace instead
    store.delete_range(6, u64::MAX).unwrap();

    assert_eq!(store.get_log(5).unwrap().data, b"keep".to_vec());
    assert!(matches!(
        store.get_log(u64::MAX),
        Err(StoreError::LogNotFound { .. })
    ));
    // The stable namespace sits outside the scan
    assert_eq!(store.get(b"meta").unwrap(), b"untouched".to_vec());
}

#[test]
fn test_delete_range_empty_log() {
    let store = test_store();
    store.delete_range(1, 10).unwrap();
    assert_eq!(store.first_index().unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Stable store
// ---------------------------------------------------------------------------

#[test]
fn test_set_get() {
    let store = test_store();

    // Not-found error on a fresh store, never a silent empty value
    assert!(matches!(
        store.get(b"bad"),
        Err(StoreError::NotFound { .. })
    ));

    store.set(b"hello", b"world").unwrap();
    assert_eq!(store.get(b"hello").unwrap(), b"world".to_vec());
}

#[test]
fn test_set_get_u64() {
    let store = test_store();

    assert!(matches!(
        store.get_u64(b"bad"),
        Err(StoreError::NotFound { .. })
    ));

    for value in [0u64, 123, u64::MAX] {
        store.set_u64(b"abc", value).unwrap();
        assert_eq!(store.get_u64(b"abc").unwrap(), value);
    }
}

#[test]
fn test_get_u64_rejects_wrong_width() {
    let store = test_store();
    store.set(b"odd", b"abc").unwrap();
    assert!(matches!(
        store.get_u64(b"odd"),
        Err(StoreError::InvalidWidth {
            expected: 8,
            actual: 3
        })
    ));
}

#[test]
fn test_stable_and_log_namespaces_disjoint() {
    let store = test_store();
    // A stable key that looks like a log key must not collide
    store.store_log(&test_record(1, "entry")).unwrap();
    let mut lookalike = Vec::new();
    lookalike.extend_from_slice(&1u64.to_be_bytes());
    assert!(matches!(
        store.get(&lookalike),
        Err(StoreError::NotFound { .. })
    ));

    store.set(&lookalike, b"stable side").unwrap();
    assert_eq!(store.get_log(1).unwrap().data, b"entry".to_vec());
    assert_eq!(store.get(&lookalike).unwrap(), b"stable side".to_vec());
}
