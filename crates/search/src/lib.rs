//! Full-text search for the dataset catalogue
//!
//! This crate provides:
//! - Normalizer: text → stemmed, position-tagged lexemes (per locale)
//! - Stemmer trait with Snowball and no-op implementations
//! - IndexedDocumentStore: search documents and posting rows kept in the
//!   same transaction as the owning entity
//! - QueryParser: raw query → ParsedQuery
//! - Ranking: Scorer trait, ProximityScorer (coverage + proximity)
//! - Highlighter: headlines with matched words marked up
//! - SearchFacade: parse → scan → rank in one consistent read
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use catalogue_core::{DocumentId, Locale, SearchConfig};
//! use catalogue_search::SearchFacade;
//! use catalogue_storage::Database;
//!
//! let search = SearchFacade::new(Arc::new(Database::in_memory()), SearchConfig::default())?;
//! let id = DocumentId::new();
//! search
//!     .database()
//!     .transaction(|txn| search.index().upsert(txn, id, "Base Carbone", "Données climat"))?;
//!
//! let matches = search.search("carbone", Locale::French)?;
//! assert_eq!(matches[0].id, id);
//! # Ok::<(), catalogue_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod facade;
pub mod headline;
pub mod index;
pub mod normalizer;
pub mod query;
pub mod ranking;
pub mod stemmer;
pub mod stopwords;
pub mod vector;

// Re-export commonly used types
pub use facade::{SearchFacade, SearchRequest, SearchResponse, SearchStats};
pub use headline::Highlighter;
pub use index::{Candidate, IndexedDocumentStore, StoredDocument};
pub use normalizer::{normalize, AnalyzedWord, Lexeme, Normalizer};
pub use query::{ParsedQuery, QueryParser};
pub use ranking::{min_cover_span, rank, ProximityScorer, ScoredMatch, Scorer};
pub use stemmer::{NoopStemmer, SnowballStemmer, Stemmer};
pub use vector::SearchVector;
