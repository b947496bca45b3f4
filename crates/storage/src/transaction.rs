//! Transaction context for optimistic concurrency control
//!
//! A `Transaction` buffers puts and deletes and records the version of every
//! key it reads. Nothing touches storage until commit, where the read set is
//! validated and the writes applied as one batch:
//!
//! - All-or-nothing: a transaction either commits every write or none
//! - First committer wins: if a key we read changed since, commit fails with
//!   `Error::TransactionConflict`
//! - Read-your-writes: reads see the transaction's own buffered writes

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;

use catalogue_core::{Key, Result, Storage, WriteBatch};

/// Summary of pending operations that would be discarded on abort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOperations {
    /// Number of pending put operations
    pub puts: usize,
    /// Number of pending delete operations
    pub deletes: usize,
}

impl PendingOperations {
    /// Total number of pending operations
    pub fn total(&self) -> usize {
        self.puts + self.deletes
    }

    /// Check if there are no pending operations
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// An in-flight optimistic transaction
pub struct Transaction<'a> {
    txn_id: u64,
    storage: &'a dyn Storage,
    /// Version observed for each key read (0 = absent), first read wins
    read_set: HashMap<Key, u64>,
    /// Buffered puts (`Some`) and deletes (`None`)
    write_set: BTreeMap<Key, Option<Vec<u8>>>,
    start_time: Instant,
}

impl<'a> Transaction<'a> {
    /// Begin a transaction over `storage`
    pub fn new(txn_id: u64, storage: &'a dyn Storage) -> Self {
        Transaction {
            txn_id,
            storage,
            read_set: HashMap::new(),
            write_set: BTreeMap::new(),
            start_time: Instant::now(),
        }
    }

    /// Transaction identifier, for logging
    pub fn txn_id(&self) -> u64 {
        self.txn_id
    }

    /// Time since the transaction began
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Read a key's raw bytes
    ///
    /// Buffered writes win over storage. A storage read is added to the
    /// read set.
    pub fn get(&mut self, key: &Key) -> Result<Option<Vec<u8>>> {
        if let Some(buffered) = self.write_set.get(key) {
            return Ok(buffered.clone());
        }

        let current = self.storage.get(key)?;
        let version = current.as_ref().map(|v| v.version).unwrap_or(0);
        self.read_set.entry(key.clone()).or_insert(version);
        Ok(current.map(|v| v.value))
    }

    /// Read and decode a key
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &Key) -> Result<Option<T>> {
        match self.get(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Whether a key currently exists, as seen by this transaction
    pub fn exists(&mut self, key: &Key) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Buffer a put of raw bytes
    pub fn put(&mut self, key: Key, value: Vec<u8>) {
        self.write_set.insert(key, Some(value));
    }

    /// Encode and buffer a put
    pub fn put_as<T: Serialize>(&mut self, key: Key, value: &T) -> Result<()> {
        let bytes = bincode::serialize(value)?;
        self.put(key, bytes);
        Ok(())
    }

    /// Buffer a delete
    ///
    /// Deleting an absent key is a no-op at commit.
    pub fn delete(&mut self, key: Key) {
        self.write_set.insert(key, None);
    }

    /// Allocate the next creation sequence value from storage
    pub fn allocate_sequence(&self) -> Result<u64> {
        self.storage.allocate_sequence()
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of keys in the read set
    pub fn read_count(&self) -> usize {
        self.read_set.len()
    }

    /// Buffered operations that would be lost on abort
    pub fn pending_operations(&self) -> PendingOperations {
        let deletes = self.write_set.values().filter(|v| v.is_none()).count();
        PendingOperations {
            puts: self.write_set.len() - deletes,
            deletes,
        }
    }

    /// Turn the transaction into a batch for `Storage::commit`
    pub fn into_batch(self) -> WriteBatch {
        WriteBatch {
            reads: self.read_set.into_iter().collect(),
            writes: self.write_set.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("txn_id", &self.txn_id)
            .field("reads", &self.read_set.len())
            .field("writes", &self.write_set.len())
            .finish()
    }
}
