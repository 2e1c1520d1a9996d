//! Error types for the Raft storage adapter
//!
//! Not-found conditions keep their own variants so a Raft engine can
//! tell "no value yet" apart from real failures. Datastore errors pass
//! through unchanged inside the `Datastore` variant.

use std::error::Error;
use std::fmt;

use helmstore_core::HelmError;

/// Raft storage error types
#[derive(Debug, Clone)]
pub enum StoreError {
    /// Stable key absent
    NotFound {
        /// The logical key that was requested
        key: String,
    },

    /// No log entry stored at the requested index
    LogNotFound {
        /// The requested log index
        index: u64,
    },

    /// A physical key in the log namespace did not carry the expected
    /// prefix and fixed-width index encoding
    CorruptKey {
        /// The offending physical key
        key: String,
    },

    /// A fixed-width integer value had the wrong byte length
    InvalidWidth {
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        actual: usize,
    },

    /// Log record serialization or deserialization failed
    Codec {
        /// Description from the codec
        reason: String,
    },

    /// Failure surfaced by the underlying datastore, unchanged
    Datastore(HelmError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { key } => {
                write!(f, "Key not found: {}", key)
            }

            StoreError::LogNotFound { index } => {
                write!(f, "Log entry not found at index {}", index)
            }

            StoreError::CorruptKey { key } => {
                write!(f, "Malformed log key: {}", key)
            }

            StoreError::InvalidWidth { expected, actual } => {
                write!(
                    f,
                    "Invalid fixed-width value: expected {} bytes, got {}",
                    expected, actual
                )
            }

            StoreError::Codec { reason } => {
                write!(f, "Log record codec error: {}", reason)
            }

            StoreError::Datastore(err) => {
                write!(f, "Datastore error: {}", err)
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Datastore(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HelmError> for StoreError {
    fn from(err: HelmError) -> Self {
        StoreError::Datastore(err)
    }
}

/// Result type alias for Raft storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Render a logical key for error messages: UTF-8 when printable,
/// hex otherwise.
pub(crate) fn display_key(key: &[u8]) -> String {
    match std::str::from_utf8(key) {
        Ok(s) => s.to_string(),
        Err(_) => key.iter().map(|b| format!("{:02x}", b)).collect(),
    }
}
