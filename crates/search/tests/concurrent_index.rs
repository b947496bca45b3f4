//! Concurrency and failure tests for the indexed document store
//!
//! 1. **Same-id writes serialize** - concurrent upserts leave one vector
//! 2. **Different ids never conflict**
//! 3. **Reads see committed writes only**
//! 4. **Storage failures propagate** - never an empty result

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use catalogue_core::{
    DocumentId, Error, Key, Locale, MatchMode, Result, SearchConfig, Storage, VersionedValue,
    WriteBatch,
};
use catalogue_search::SearchFacade;
use catalogue_storage::{Database, RetryConfig, UnifiedStore};

// ============================================================================
// Test Helpers
// ============================================================================

const TITLES: &[&str] = &["montagne", "riviere", "prairie", "volcan", "glacier", "marais"];

fn contended_db() -> Arc<Database> {
    Arc::new(
        Database::in_memory().with_retry(RetryConfig::immediate(10_000)),
    )
}

fn search_ids(facade: &SearchFacade, q: &str) -> Vec<DocumentId> {
    facade
        .search(q, Locale::French)
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect()
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn concurrent_upserts_same_id_leave_one_vector() {
    let facade = Arc::new(SearchFacade::new(contended_db(), SearchConfig::default()).unwrap());
    let id = DocumentId::new();
    let barrier = Arc::new(Barrier::new(TITLES.len()));

    let handles: Vec<_> = TITLES
        .iter()
        .map(|title| {
            let facade = Arc::clone(&facade);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..20 {
                    facade
                        .database()
                        .transaction(|txn| facade.index().upsert(txn, id, title, ""))
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    // Exactly one title's postings survive
    let found: Vec<_> = TITLES
        .iter()
        .filter(|title| search_ids(&facade, title) == vec![id])
        .collect();
    assert_eq!(found.len(), 1);

    let doc = facade
        .index()
        .get_document(facade.database().storage(), &id)
        .unwrap()
        .unwrap();
    let expected = facade.parse(found[0]);
    assert_eq!(
        doc.vector.lexemes().collect::<Vec<_>>(),
        expected.lexemes().iter().map(String::as_str).collect::<Vec<_>>()
    );
    assert_eq!(facade.index().document_count(facade.database().storage()).unwrap(), 1);
}

#[test]
fn concurrent_upserts_different_ids_do_not_conflict() {
    let facade = Arc::new(SearchFacade::new(contended_db(), SearchConfig::default()).unwrap());
    let barrier = Arc::new(Barrier::new(TITLES.len()));

    let handles: Vec<_> = TITLES
        .iter()
        .map(|title| {
            let facade = Arc::clone(&facade);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let id = DocumentId::new();
                facade
                    .database()
                    .transaction(|txn| facade.index().upsert(txn, id, title, "glacier"))
                    .unwrap();
                id
            })
        })
        .collect();
    let ids: Vec<DocumentId> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(facade.database().metrics().conflicts, 0);
    assert_eq!(search_ids(&facade, "glacier").len(), ids.len());
}

#[test]
fn concurrent_searches_during_writes_see_whole_documents() {
    let config = SearchConfig::default().with_match_mode(MatchMode::All);
    let facade = Arc::new(SearchFacade::new(contended_db(), config).unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    let writer = {
        let facade = Arc::clone(&facade);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let id = DocumentId::new();
            let mut flip = false;
            while !stop.load(Ordering::Relaxed) {
                let (title, body) = if flip {
                    ("montagne", "volcan")
                } else {
                    ("riviere", "marais")
                };
                facade
                    .database()
                    .transaction(|txn| facade.index().upsert(txn, id, title, body))
                    .unwrap();
                flip = !flip;
            }
        })
    };

    for _ in 0..500 {
        // Title and body of one write commit together: never half of each
        assert!(search_ids(&facade, "montagne marais").is_empty());
        assert!(search_ids(&facade, "riviere volcan").is_empty());
    }
    stop.store(true, Ordering::Relaxed);
    writer.join().unwrap();
}

// ============================================================================
// Storage failure
// ============================================================================

/// UnifiedStore whose reads can be switched off
struct FlakyStorage {
    inner: UnifiedStore,
    broken: AtomicBool,
}

impl FlakyStorage {
    fn check(&self) -> Result<()> {
        if self.broken.load(Ordering::SeqCst) {
            Err(Error::Storage("backend unavailable".into()))
        } else {
            Ok(())
        }
    }
}

impl Storage for FlakyStorage {
    fn get(&self, key: &Key) -> Result<Option<VersionedValue>> {
        self.check()?;
        self.inner.get(key)
    }

    fn scan_prefix(&self, prefix: &Key) -> Result<Vec<(Key, VersionedValue)>> {
        self.check()?;
        self.inner.scan_prefix(prefix)
    }

    fn scan_prefixes(&self, prefixes: &[Key]) -> Result<Vec<Vec<(Key, VersionedValue)>>> {
        self.check()?;
        self.inner.scan_prefixes(prefixes)
    }

    fn commit(&self, batch: WriteBatch) -> Result<u64> {
        self.check()?;
        self.inner.commit(batch)
    }

    fn allocate_sequence(&self) -> Result<u64> {
        self.check()?;
        self.inner.allocate_sequence()
    }

    fn current_version(&self) -> u64 {
        self.inner.current_version()
    }
}

#[test]
fn storage_failure_propagates_from_search() {
    let storage = Arc::new(FlakyStorage {
        inner: UnifiedStore::new(),
        broken: AtomicBool::new(false),
    });
    let db = Arc::new(Database::with_storage(storage.clone()));
    let facade = SearchFacade::new(db, SearchConfig::default()).unwrap();
    facade
        .database()
        .transaction(|txn| facade.index().upsert(txn, DocumentId::new(), "Base Carbone", ""))
        .unwrap();

    storage.broken.store(true, Ordering::SeqCst);
    let err = facade.search("carbone", Locale::French).unwrap_err();
    assert!(err.is_storage());

    // Empty queries never reach storage
    assert!(facade.search("", Locale::French).unwrap().is_empty());
}

#[test]
fn storage_failure_propagates_from_upsert() {
    let storage = Arc::new(FlakyStorage {
        inner: UnifiedStore::new(),
        broken: AtomicBool::new(true),
    });
    let facade =
        SearchFacade::new(Arc::new(Database::with_storage(storage)), SearchConfig::default())
            .unwrap();

    let err = facade
        .database()
        .transaction(|txn| facade.index().upsert(txn, DocumentId::new(), "Base", ""))
        .unwrap_err();
    assert!(err.is_storage());
}
