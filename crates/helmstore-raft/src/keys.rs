//! Key encoding for the two Raft namespaces.
//!
//! One flat datastore key space is split with one-byte prefixes:
//! `b"l"` for log entries, `b"s"` for stable metadata. Log indices are
//! encoded as fixed-width big-endian bytes, so byte-lexicographic key
//! order equals numeric index order — the invariant that makes
//! first/last-index queries a plain ordered scan.

use crate::error::{display_key, StoreError, StoreResult};

/// Namespace prefix for log entries.
pub const LOG_PREFIX: &[u8] = b"l";

/// Namespace prefix for stable metadata.
pub const STABLE_PREFIX: &[u8] = b"s";

/// Physical key for a stable entry: `b"s" || key`.
pub fn stable_key(key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(STABLE_PREFIX.len() + key.len());
    out.extend_from_slice(STABLE_PREFIX);
    out.extend_from_slice(key);
    out
}

/// Physical key for a log entry: `b"l" || big_endian(index)`.
pub fn log_key(index: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(LOG_PREFIX.len() + 8);
    out.extend_from_slice(LOG_PREFIX);
    out.extend_from_slice(&index.to_be_bytes());
    out
}

/// Recover the log index from a physical key.
pub fn index_from_key(key: &[u8]) -> StoreResult<u64> {
    let rest = key
        .strip_prefix(LOG_PREFIX)
        .ok_or_else(|| StoreError::CorruptKey {
            key: display_key(key),
        })?;
    u64_from_bytes(rest)
}

/// Decode a fixed-width big-endian `u64`; exactly 8 bytes required.
pub fn u64_from_bytes(bytes: &[u8]) -> StoreResult<u64> {
    let arr: [u8; 8] = bytes.try_into().map_err(|_| StoreError::InvalidWidth {
        expected: 8,
        actual: bytes.len(),
    })?;
    Ok(u64::from_be_bytes(arr))
}
