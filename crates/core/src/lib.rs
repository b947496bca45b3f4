//! Core types and traits for the catalogue
//!
//! This crate defines the foundational types used throughout the system:
//! - DocumentId: identity shared by an entity and its search document
//! - Table / Key: logical tables and composite keys of the ordered store
//! - Locale: text-search language configuration
//! - SearchConfig: explicit search configuration (`catalogue.toml`)
//! - Error: error type hierarchy
//! - Traits: Storage abstraction and WriteBatch

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod locale;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use config::{HeadlineConfig, MatchMode, SearchConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use locale::Locale;
pub use traits::{Storage, WriteBatch};
pub use types::{DocumentId, Key, Table, VersionedValue};
