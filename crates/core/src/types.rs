//! Core identifier and key types
//!
//! - `DocumentId`: identity of a catalogue entity and of its search document
//! - `Table`: discriminates the logical tables sharing one ordered store
//! - `Key`: composite `(table, user_key)` storage key
//! - `VersionedValue`: stored bytes plus the commit version that wrote them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

// ============================================================================
// DocumentId
// ============================================================================

/// Unique identifier of a catalogue entity
///
/// The same id keys the entity row and its search document, which is what
/// makes the two 1:1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Create a new random id
    pub fn new() -> Self {
        DocumentId(Uuid::new_v4())
    }

    /// Rebuild an id from its 16 key bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        DocumentId(Uuid::from_bytes(bytes))
    }

    /// Big-endian bytes, used inside storage keys
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(DocumentId)
            .map_err(|e| Error::InvalidInput(format!("invalid document id '{}': {}", s, e)))
    }
}

// ============================================================================
// Table
// ============================================================================

/// Logical table a key belongs to
///
/// Tables share a single ordered store so that one transaction can span
/// entity rows and their search index rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    /// Dataset entity rows, keyed by id
    Dataset,
    /// Search document rows (vector + creation sequence), keyed by id
    SearchDocument,
    /// Posting rows, keyed by `lexeme 0x00 id`
    SearchPosting,
}

impl Table {
    /// Stable name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Dataset => "dataset",
            Table::SearchDocument => "search_document",
            Table::SearchPosting => "search_posting",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Key
// ============================================================================

/// Composite storage key
///
/// Ordering is table first, then user key bytes, so every table is a
/// contiguous range and prefix scans within a table are range scans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    /// Table discriminator
    pub table: Table,
    /// Table-local key bytes
    pub user_key: Vec<u8>,
}

impl Key {
    /// Create a key from a table and raw bytes
    pub fn new(table: Table, user_key: impl Into<Vec<u8>>) -> Self {
        Key {
            table,
            user_key: user_key.into(),
        }
    }

    /// Key of an id-addressed row (entity or search document)
    pub fn for_id(table: Table, id: &DocumentId) -> Self {
        Key::new(table, id.as_bytes().to_vec())
    }

    /// Prefix matching every key of a table
    pub fn table_prefix(table: Table) -> Self {
        Key::new(table, Vec::new())
    }

    /// Whether this key lies under `prefix`
    pub fn starts_with(&self, prefix: &Key) -> bool {
        self.table == prefix.table && self.user_key.starts_with(&prefix.user_key)
    }
}

// ============================================================================
// VersionedValue
// ============================================================================

/// Stored bytes together with the commit version that wrote them
///
/// Versions are assigned by the store and increase monotonically; a key that
/// does not exist is treated as version 0 during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    /// Encoded row
    pub value: Vec<u8>,
    /// Commit version of the last write
    pub version: u64,
}

impl VersionedValue {
    /// Create a versioned value
    pub fn new(value: Vec<u8>, version: u64) -> Self {
        VersionedValue { value, version }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_unique() {
        let a = DocumentId::new();
        let b = DocumentId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_document_id_bytes_roundtrip() {
        let id = DocumentId::new();
        assert_eq!(DocumentId::from_bytes(*id.as_bytes()), id);
    }

    #[test]
    fn test_document_id_parse() {
        let id = DocumentId::new();
        let parsed: DocumentId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        let err = "not-a-uuid".parse::<DocumentId>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_key_ordering_groups_tables() {
        let id = DocumentId::new();
        let dataset = Key::for_id(Table::Dataset, &id);
        let doc = Key::for_id(Table::SearchDocument, &id);
        let posting = Key::new(Table::SearchPosting, b"aaa".to_vec());

        assert!(dataset < doc);
        assert!(doc < posting);
    }

    #[test]
    fn test_key_starts_with() {
        let prefix = Key::new(Table::SearchPosting, "forêt\0".as_bytes().to_vec());
        let mut bytes = "forêt\0".as_bytes().to_vec();
        bytes.extend_from_slice(DocumentId::new().as_bytes());
        let key = Key::new(Table::SearchPosting, bytes);

        assert!(key.starts_with(&prefix));
        assert!(key.starts_with(&Key::table_prefix(Table::SearchPosting)));
        assert!(!key.starts_with(&Key::table_prefix(Table::Dataset)));

        // Lexeme prefixes must not match longer lexemes
        let other = Key::new(Table::SearchPosting, b"forestier\0".to_vec());
        assert!(!other.starts_with(&prefix));
    }

    #[test]
    fn test_table_display() {
        assert_eq!(Table::Dataset.to_string(), "dataset");
        assert_eq!(Table::SearchPosting.to_string(), "search_posting");
    }
}
