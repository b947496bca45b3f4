//! Storage layer for the catalogue
//!
//! This crate implements the transactional storage backend with:
//! - UnifiedStore: BTreeMap-based storage with RwLock
//! - Transaction: optimistic read set / write set buffering
//! - Database: transaction lifecycle with retry on conflict
//! - Version management with AtomicU64

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod retry;
pub mod transaction;
pub mod unified;

pub use database::{Database, TransactionMetrics};
pub use retry::RetryConfig;
pub use transaction::{PendingOperations, Transaction};
pub use unified::UnifiedStore;
