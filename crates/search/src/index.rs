//! Indexed document store
//!
//! Each searchable entity has one document row holding its search vector
//! and creation sequence, plus one posting row per lexeme:
//!
//! - `SearchDocument / id` → `StoredDocument { id, seq, vector }`
//! - `SearchPosting / lexeme 0x00 id` → `PostingRow { seq, positions }`
//!
//! Writes go through the caller's transaction, so the document commits or
//! aborts together with the owning entity. Posting rows under one lexeme
//! are contiguous in key order, so candidate generation is one prefix scan
//! per query lexeme.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use catalogue_core::{DocumentId, Error, Key, Result, Storage, Table};
use catalogue_storage::Transaction;

use crate::normalizer::Normalizer;
use crate::query::ParsedQuery;
use crate::vector::SearchVector;

/// Separates the lexeme from the id in posting keys
const POSTING_SEPARATOR: u8 = 0x00;

/// A stored search document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Owning entity id
    pub id: DocumentId,
    /// Creation sequence, preserved across updates
    pub seq: u64,
    /// Derived search vector
    pub vector: SearchVector,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PostingRow {
    seq: u64,
    positions: Vec<u32>,
}

/// A document that matched at least one query lexeme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Document id
    pub id: DocumentId,
    /// Creation sequence (tie-breaker)
    pub seq: u64,
    /// Positions per query lexeme, aligned with `ParsedQuery::lexemes`;
    /// empty where the lexeme is absent
    pub positions: Vec<Vec<u32>>,
}

impl Candidate {
    /// Number of distinct query lexemes present
    pub fn coverage(&self) -> usize {
        self.positions.iter().filter(|p| !p.is_empty()).count()
    }
}

/// Store of search documents kept in sync with their entities
#[derive(Debug, Clone)]
pub struct IndexedDocumentStore {
    normalizer: Arc<Normalizer>,
}

impl IndexedDocumentStore {
    /// Store indexing with `normalizer`
    pub fn new(normalizer: Arc<Normalizer>) -> Self {
        IndexedDocumentStore { normalizer }
    }

    /// The normalizer used for documents
    pub fn normalizer(&self) -> &Arc<Normalizer> {
        &self.normalizer
    }

    /// Insert or replace the document of `id` inside `txn`
    ///
    /// The vector is recomputed from `title` and `body`. Posting rows of
    /// lexemes no longer present are deleted. The document row is read
    /// first, so two transactions writing the same id conflict at commit.
    pub fn upsert(
        &self,
        txn: &mut Transaction<'_>,
        id: DocumentId,
        title: &str,
        body: &str,
    ) -> Result<()> {
        let doc_key = document_key(&id);
        let previous: Option<StoredDocument> = txn.get_as(&doc_key)?;

        let seq = match &previous {
            Some(doc) => doc.seq,
            None => txn.allocate_sequence()?,
        };
        let vector = self.normalizer.normalize_document(title, body);

        if let Some(previous) = &previous {
            for lexeme in previous.vector.lexemes() {
                if !vector.contains(lexeme) {
                    txn.delete(posting_key(lexeme, &id));
                }
            }
        }

        for (lexeme, positions) in vector.iter() {
            txn.put_as(
                posting_key(lexeme, &id),
                &PostingRow {
                    seq,
                    positions: positions.to_vec(),
                },
            )?;
        }

        debug!(
            txn_id = txn.txn_id(),
            %id,
            seq,
            lexemes = vector.len(),
            update = previous.is_some(),
            "indexed document"
        );

        txn.put_as(doc_key, &StoredDocument { id, seq, vector })
    }

    /// Remove the document of `id` inside `txn`
    ///
    /// Idempotent. Returns whether a document existed.
    pub fn remove(&self, txn: &mut Transaction<'_>, id: DocumentId) -> Result<bool> {
        let doc_key = document_key(&id);
        let previous: Option<StoredDocument> = txn.get_as(&doc_key)?;

        let Some(previous) = previous else {
            return Ok(false);
        };

        for lexeme in previous.vector.lexemes() {
            txn.delete(posting_key(lexeme, &id));
        }
        txn.delete(doc_key);

        debug!(txn_id = txn.txn_id(), %id, "removed document");
        Ok(true)
    }

    /// Read a committed document
    pub fn get_document(
        &self,
        storage: &dyn Storage,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>> {
        match storage.get(&document_key(id))? {
            Some(value) => Ok(Some(bincode::deserialize(&value.value)?)),
            None => Ok(None),
        }
    }

    /// Number of committed documents
    pub fn document_count(&self, storage: &dyn Storage) -> Result<usize> {
        Ok(storage
            .scan_prefix(&Key::table_prefix(Table::SearchDocument))?
            .len())
    }

    /// Every document containing at least one query lexeme
    ///
    /// All posting prefixes are read in one consistent scan. Candidates come
    /// back in creation order. An empty query returns nothing without
    /// touching storage.
    pub fn scan_candidates(
        &self,
        storage: &dyn Storage,
        query: &ParsedQuery,
    ) -> Result<Vec<Candidate>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let prefixes: Vec<Key> = query.lexemes().iter().map(|l| posting_prefix(l)).collect();
        let scans = storage.scan_prefixes(&prefixes)?;

        let mut candidates: FxHashMap<DocumentId, Candidate> = FxHashMap::default();
        for (lexeme_idx, rows) in scans.into_iter().enumerate() {
            for (key, value) in rows {
                let id = posting_id(&key)?;
                let row: PostingRow = bincode::deserialize(&value.value)?;
                let candidate = candidates.entry(id).or_insert_with(|| Candidate {
                    id,
                    seq: row.seq,
                    positions: vec![Vec::new(); query.len()],
                });
                candidate.positions[lexeme_idx] = row.positions;
            }
        }

        let mut candidates: Vec<Candidate> = candidates.into_values().collect();
        candidates.sort_by(|a, b| a.seq.cmp(&b.seq).then_with(|| a.id.cmp(&b.id)));
        Ok(candidates)
    }
}

fn document_key(id: &DocumentId) -> Key {
    Key::for_id(Table::SearchDocument, id)
}

fn posting_prefix(lexeme: &str) -> Key {
    let mut user_key = Vec::with_capacity(lexeme.len() + 1);
    user_key.extend_from_slice(lexeme.as_bytes());
    user_key.push(POSTING_SEPARATOR);
    Key::new(Table::SearchPosting, user_key)
}

fn posting_key(lexeme: &str, id: &DocumentId) -> Key {
    let mut key = posting_prefix(lexeme);
    key.user_key.extend_from_slice(id.as_bytes());
    key
}

/// Document id from the last 16 bytes of a posting key
fn posting_id(key: &Key) -> Result<DocumentId> {
    let len = key.user_key.len();
    let bytes: [u8; 16] = len
        .checked_sub(16)
        .and_then(|start| key.user_key[start..].try_into().ok())
        .ok_or_else(|| Error::Storage(format!("malformed posting key {:?}", key.user_key)))?;
    Ok(DocumentId::from_bytes(bytes))
}
