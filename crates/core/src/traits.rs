//! Core storage abstraction
//!
//! The `Storage` trait lets the transaction layer and the search index run on
//! top of any ordered, versioned key-value backend. The in-memory store lives
//! in `catalogue-storage`; tests plug in failing backends to check that
//! storage errors propagate.

use crate::error::Result;
use crate::types::{Key, VersionedValue};

/// Writes of one transaction, applied atomically by `Storage::commit`
///
/// `reads` carries the version every key had when the transaction read it
/// (0 = absent). The store rejects the batch if any of them changed.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    /// Read set to validate: `(key, version observed)`
    pub reads: Vec<(Key, u64)>,
    /// Puts (`Some`) and deletes (`None`)
    pub writes: Vec<(Key, Option<Vec<u8>>)>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffered puts and deletes
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether the batch has no writes
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Storage abstraction for the ordered versioned backend
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait Storage: Send + Sync {
    /// Get the current value of a key
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, key: &Key) -> Result<Option<VersionedValue>>;

    /// Scan all keys under a prefix, in key order
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn scan_prefix(&self, prefix: &Key) -> Result<Vec<(Key, VersionedValue)>>;

    /// Scan several prefixes as one consistent read
    ///
    /// No commit can interleave between the individual scans. Result `i`
    /// holds the rows under `prefixes[i]`, in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn scan_prefixes(&self, prefixes: &[Key]) -> Result<Vec<Vec<(Key, VersionedValue)>>>;

    /// Validate the batch's read set and apply its writes atomically
    ///
    /// All writes get the same new commit version, which is returned.
    ///
    /// # Errors
    ///
    /// `Error::TransactionConflict` if a key in the read set changed,
    /// `Error::Storage` if the backend fails. Nothing is applied on error.
    fn commit(&self, batch: WriteBatch) -> Result<u64>;

    /// Allocate the next value of the store-wide creation sequence
    ///
    /// Monotonic; values used by aborted transactions are simply skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn allocate_sequence(&self) -> Result<u64>;

    /// Highest commit version applied so far
    fn current_version(&self) -> u64;
}
