//! Database handle: storage plus the transaction lifecycle
//!
//! `Database` owns a `Storage` backend and runs closures inside optimistic
//! transactions, retrying on conflict according to its `RetryConfig`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use catalogue_core::{Error, Result, Storage};

use crate::retry::RetryConfig;
use crate::transaction::Transaction;
use crate::unified::UnifiedStore;

/// Counters for committed and conflicting transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionMetrics {
    /// Transactions that committed
    pub commits: u64,
    /// Commit attempts rejected by validation
    pub conflicts: u64,
}

/// Shared handle over a storage backend
pub struct Database {
    storage: Arc<dyn Storage>,
    retry: RetryConfig,
    next_txn_id: AtomicU64,
    commits: AtomicU64,
    conflicts: AtomicU64,
}

impl Database {
    /// Database over a fresh in-memory `UnifiedStore`
    pub fn in_memory() -> Self {
        Self::with_storage(Arc::new(UnifiedStore::new()))
    }

    /// Database over any storage backend
    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Database {
            storage,
            retry: RetryConfig::default(),
            next_txn_id: AtomicU64::new(1),
            commits: AtomicU64::new(0),
            conflicts: AtomicU64::new(0),
        }
    }

    /// Builder: replace the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The storage backend, for reads outside a transaction
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Commit/conflict counters
    pub fn metrics(&self) -> TransactionMetrics {
        TransactionMetrics {
            commits: self.commits.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
        }
    }

    /// Begin a new transaction (for manual control)
    ///
    /// Prefer the `transaction()` closure API, which commits and retries.
    pub fn begin_transaction(&self) -> Transaction<'_> {
        let txn_id = self.next_txn_id.fetch_add(1, Ordering::Relaxed);
        Transaction::new(txn_id, self.storage.as_ref())
    }

    /// Validate and apply a transaction
    ///
    /// Returns the commit version.
    pub fn commit_transaction(&self, txn: Transaction<'_>) -> Result<u64> {
        let txn_id = txn.txn_id();
        let reads = txn.read_count();
        let pending = txn.pending_operations();
        let elapsed_us = u64::try_from(txn.elapsed().as_micros()).unwrap_or(u64::MAX);

        match self.storage.commit(txn.into_batch()) {
            Ok(version) => {
                self.commits.fetch_add(1, Ordering::Relaxed);
                debug!(
                    txn_id,
                    version,
                    reads,
                    puts = pending.puts,
                    deletes = pending.deletes,
                    elapsed_us,
                    "transaction committed"
                );
                Ok(version)
            }
            Err(e) => {
                if e.is_conflict() {
                    self.conflicts.fetch_add(1, Ordering::Relaxed);
                }
                Err(e)
            }
        }
    }

    /// Execute a closure in a transaction, retrying on conflict
    ///
    /// The closure is called repeatedly until either:
    /// - The transaction commits successfully
    /// - A non-conflict error occurs (not retried)
    /// - Maximum retries are exceeded
    ///
    /// The closure must be `Fn` since it may run more than once. Errors it
    /// returns abort the attempt without writing anything.
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: Fn(&mut Transaction<'_>) -> Result<T>,
    {
        let mut last_error = None;

        for attempt in 0..=self.retry.max_retries {
            let mut txn = self.begin_transaction();
            let txn_id = txn.txn_id();
            let outcome = f(&mut txn).and_then(|value| {
                self.commit_transaction(txn)?;
                Ok(value)
            });

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if self.retry.should_retry(&e, attempt) => {
                    warn!(txn_id, attempt, error = %e, "transaction conflict, retrying");
                    std::thread::sleep(self.retry.delay_for(attempt));
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        // The loop returns on its last attempt; kept for the type checker
        Err(last_error.unwrap_or_else(|| {
            Error::Storage("retry loop exited without returning a result".to_string())
        }))
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("version", &self.storage.current_version())
            .field("retry", &self.retry)
            .finish()
    }
}
