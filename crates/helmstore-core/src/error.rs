//! Error types for datastore operations
//!
//! All datastore errors are represented by the HelmError enum. A missing
//! key is not an error at this layer — `get` returns `Ok(None)` so that
//! callers can layer their own not-found semantics on top.

use std::error::Error;
use std::fmt;

/// Datastore error types
#[derive(Debug, Clone)]
pub enum HelmError {
    /// The datastore has been closed; no further operations are accepted
    Closed,

    /// Failure reported by the backing store
    Backend {
        /// Human-readable description from the backend
        message: String,
    },
}

impl fmt::Display for HelmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelmError::Closed => {
                write!(f, "Datastore is closed")
            }

            HelmError::Backend { message } => {
                write!(f, "Backend error: {}", message)
            }
        }
    }
}

impl Error for HelmError {}

/// Result type alias for datastore operations
pub type HelmResult<T> = Result<T, HelmError>;
