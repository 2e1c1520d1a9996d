//! Query descriptor and result cursor.
//!
//! A `Query` describes an ordered scan over the datastore: scoped to a
//! key prefix, optionally bounded by a half-open physical key range,
//! ascending or descending, keys-only or full entries, with an optional
//! result limit. Range bounds intersect with the prefix bounds — a key
//! must satisfy both to be yielded.

use crate::error::HelmResult;

/// Traversal order for a query.
///
/// Descending order is executed natively by the backend, never by
/// fetching ascending and reversing client-side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    /// Smallest key first
    #[default]
    Ascending,
    /// Largest key first
    Descending,
}

/// Half-open physical key range `[start, end)`.
///
/// `None` on either side leaves that side unbounded. Bounds are
/// absolute physical keys, not prefix-relative.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyRange {
    /// Inclusive lower bound
    pub start: Option<Vec<u8>>,
    /// Exclusive upper bound
    pub end: Option<Vec<u8>>,
}

/// Descriptor for an ordered scan.
#[derive(Clone, Debug, Default)]
pub struct Query {
    /// Only keys starting with this prefix are yielded
    pub prefix: Vec<u8>,
    /// Additional half-open key range, intersected with the prefix
    pub range: KeyRange,
    /// Traversal order
    pub order: Order,
    /// When set, entries carry empty values (key-only scan)
    pub keys_only: bool,
    /// Maximum number of entries to yield
    pub limit: Option<usize>,
}

/// A single query result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Full physical key
    pub key: Vec<u8>,
    /// Value bytes; empty when the query was keys-only
    pub value: Vec<u8>,
}

/// Result cursor for a query.
///
/// Dropping the cursor releases the underlying scan, so every return
/// path — including early error returns — cleans up deterministically.
pub type Cursor<'a> = Box<dyn Iterator<Item = HelmResult<Entry>> + Send + 'a>;
