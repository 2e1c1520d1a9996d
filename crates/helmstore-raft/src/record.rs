//! The log record persisted for each Raft log entry.

use serde::{Deserialize, Serialize};

/// What a log entry carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// A state-machine command
    #[default]
    Command,
    /// A no-op appended by a new leader to assert its term
    Noop,
    /// A barrier used to wait for preceding entries to apply
    Barrier,
    /// A cluster membership change
    Configuration,
}

/// A single Raft log entry as stored by the log store.
///
/// `data` and `extensions` are opaque to the adapter and round-trip
/// byte-for-byte through the codec.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Position of the entry in the log; never 0 (0 is the "no
    /// entries" sentinel returned by first/last index)
    pub index: u64,
    /// Election term the entry was appended under
    pub term: u64,
    /// Entry kind
    pub kind: RecordKind,
    /// Opaque payload
    pub data: Vec<u8>,
    /// Opaque consumer metadata carried alongside the payload
    pub extensions: Vec<u8>,
}

impl LogRecord {
    /// A command record with the given index and payload.
    pub fn command(index: u64, data: impl Into<Vec<u8>>) -> Self {
        Self {
            index,
            data: data.into(),
            ..Default::default()
        }
    }
}
