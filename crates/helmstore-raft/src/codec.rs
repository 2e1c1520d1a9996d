//! Log record serialization.
//!
//! Records are stored as CBOR. The encoding is self-describing, so a
//! record gains fields without invalidating entries already on disk.

use crate::error::{StoreError, StoreResult};
use crate::record::LogRecord;

/// Serialize a record to its stored byte form.
pub fn encode(record: &LogRecord) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(record, &mut buf).map_err(|e| StoreError::Codec {
        reason: e.to_string(),
    })?;
    Ok(buf)
}

/// Deserialize a record from its stored byte form.
pub fn decode(bytes: &[u8]) -> StoreResult<LogRecord> {
    ciborium::de::from_reader(bytes).map_err(|e| StoreError::Codec {
        reason: e.to_string(),
    })
}
