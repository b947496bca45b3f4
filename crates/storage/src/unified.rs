//! UnifiedStore: in-memory storage backend with BTreeMap and version management
//!
//! This module implements the Storage trait using:
//! - `BTreeMap<Key, VersionedValue>` for ordered key storage
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for monotonically increasing commit versions
//! - A second `AtomicU64` for the creation sequence
//!
//! # Design Notes
//!
//! - **One map for every table**: entity rows, search documents and posting
//!   rows share the map, so one commit covers an entity and its index rows.
//! - **No version history**: each key stores only its latest value.
//! - **Validation under the write lock**: the read set is checked and the
//!   writes applied in the same critical section, so no reader can see a
//!   partial transaction.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use catalogue_core::{Error, Key, Result, Storage, VersionedValue, WriteBatch};

/// Unified storage backend using BTreeMap with RwLock
///
/// Implements the Storage trait. Thread-safe through `parking_lot::RwLock`
/// and atomics.
#[derive(Debug, Default)]
pub struct UnifiedStore {
    /// The main data store: ordered map from Key to VersionedValue
    data: RwLock<BTreeMap<Key, VersionedValue>>,
    /// Global version counter, bumped once per non-empty commit
    version: AtomicU64,
    /// Creation sequence counter
    sequence: AtomicU64,
}

impl UnifiedStore {
    /// Create a new empty UnifiedStore
    ///
    /// Initial version is 0 (no writes have occurred).
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys across all tables
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    fn scan_locked(
        data: &BTreeMap<Key, VersionedValue>,
        prefix: &Key,
    ) -> Vec<(Key, VersionedValue)> {
        data.range((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl Storage for UnifiedStore {
    fn get(&self, key: &Key) -> Result<Option<VersionedValue>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn scan_prefix(&self, prefix: &Key) -> Result<Vec<(Key, VersionedValue)>> {
        let data = self.data.read();
        Ok(Self::scan_locked(&data, prefix))
    }

    fn scan_prefixes(&self, prefixes: &[Key]) -> Result<Vec<Vec<(Key, VersionedValue)>>> {
        // One lock acquisition for all prefixes: a single consistent read
        let data = self.data.read();
        Ok(prefixes
            .iter()
            .map(|prefix| Self::scan_locked(&data, prefix))
            .collect())
    }

    fn commit(&self, batch: WriteBatch) -> Result<u64> {
        let mut data = self.data.write();

        for (key, read_version) in &batch.reads {
            let current_version = data.get(key).map(|v| v.version).unwrap_or(0);
            if current_version != *read_version {
                return Err(Error::TransactionConflict(format!(
                    "{} key {:?} read at version {} but is now at version {}",
                    key.table, key.user_key, read_version, current_version
                )));
            }
        }

        if batch.writes.is_empty() {
            return Ok(self.version.load(Ordering::Acquire));
        }

        // Allocated under the write lock, so commit versions are applied in order
        let commit_version = self.version.fetch_add(1, Ordering::AcqRel) + 1;

        for (key, value) in batch.writes {
            match value {
                Some(bytes) => {
                    data.insert(key, VersionedValue::new(bytes, commit_version));
                }
                None => {
                    data.remove(&key);
                }
            }
        }

        Ok(commit_version)
    }

    fn allocate_sequence(&self) -> Result<u64> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn current_version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}
