//! Search facade: parse → scan candidates → rank
//!
//! One search is one consistent read of the index. The facade never
//! paginates; callers slice the ranked list.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use catalogue_core::{Error, Locale, MatchMode, Result, SearchConfig};
use catalogue_storage::Database;

use crate::headline::Highlighter;
use crate::index::IndexedDocumentStore;
use crate::normalizer::Normalizer;
use crate::query::{ParsedQuery, QueryParser};
use crate::ranking::{score_candidate, sort_matches, ProximityScorer, ScoredMatch, Scorer};

/// Candidates scored between two deadline checks
const DEADLINE_CHECK_INTERVAL: usize = 256;

// ============================================================================
// Request / Response
// ============================================================================

/// A search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Raw user query
    pub query: String,
    /// Query locale; defaults to the index locale
    pub locale: Option<Locale>,
    /// Deadline; defaults to the configured search timeout
    pub deadline: Option<Duration>,
    /// Match mode; defaults to the configured mode
    pub match_mode: Option<MatchMode>,
}

impl SearchRequest {
    /// Request for a raw query with default settings
    pub fn new(query: impl Into<String>) -> Self {
        SearchRequest {
            query: query.into(),
            locale: None,
            deadline: None,
            match_mode: None,
        }
    }

    /// Builder: set locale
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Builder: set deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builder: set match mode
    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = Some(match_mode);
        self
    }
}

/// Execution statistics of one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Distinct lexemes in the parsed query
    pub lexemes: usize,
    /// Documents returned by candidate generation
    pub candidates_considered: usize,
    /// Wall time of the search
    pub elapsed_micros: u64,
}

/// Ranked matches plus statistics
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    /// Matches in rank order
    pub matches: Vec<ScoredMatch>,
    /// Execution statistics
    pub stats: SearchStats,
}

// ============================================================================
// SearchFacade
// ============================================================================

/// Entry point of the search subsystem
///
/// Owns the normalizer shared by indexing, parsing and highlighting, so all
/// three agree on lexemes.
pub struct SearchFacade {
    db: Arc<Database>,
    config: SearchConfig,
    parser: QueryParser,
    index: IndexedDocumentStore,
    highlighter: Highlighter,
    scorer: Arc<dyn Scorer>,
}

impl SearchFacade {
    /// Facade over `db` with a validated config
    pub fn new(db: Arc<Database>, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = Arc::new(Normalizer::new(&config));
        Ok(SearchFacade {
            db,
            parser: QueryParser::new(Arc::clone(&normalizer)),
            index: IndexedDocumentStore::new(Arc::clone(&normalizer)),
            highlighter: Highlighter::new(normalizer, config.headline.clone()),
            scorer: Arc::new(ProximityScorer),
            config,
        })
    }

    /// Builder: replace the scorer
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The index, for writes inside entity transactions
    pub fn index(&self) -> &IndexedDocumentStore {
        &self.index
    }

    /// The highlighter
    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// The database searched
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Parse a raw query with the index's normalizer
    pub fn parse(&self, raw: &str) -> ParsedQuery {
        self.parser.parse(raw)
    }

    /// Search and return matches in rank order
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if `locale` is not the index locale,
    /// `Error::Storage` on storage failure, `Error::Timeout` if the
    /// configured deadline passes.
    pub fn search(&self, raw_query: &str, locale: Locale) -> Result<Vec<ScoredMatch>> {
        self.execute(&SearchRequest::new(raw_query).with_locale(locale))
            .map(|response| response.matches)
    }

    /// Execute a search request
    pub fn execute(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let start = Instant::now();

        let locale = request.locale.unwrap_or(self.config.locale);
        if locale != self.config.locale {
            return Err(Error::InvalidInput(format!(
                "index locale is {}, cannot search in {}",
                self.config.locale, locale
            )));
        }
        let deadline = request.deadline.or_else(|| self.config.search_timeout());
        let match_mode = request.match_mode.unwrap_or(self.config.match_mode);

        let query = self.parser.parse(&request.query);
        if query.is_empty() {
            debug!(query = %request.query, "empty query, no matches");
            return Ok(SearchResponse {
                matches: Vec::new(),
                stats: SearchStats {
                    elapsed_micros: elapsed_micros(start),
                    ..SearchStats::default()
                },
            });
        }

        let candidates = self.index.scan_candidates(self.db.storage(), &query)?;
        check_deadline(start, deadline)?;

        let mut matches = Vec::with_capacity(candidates.len());
        for (i, candidate) in candidates.iter().enumerate() {
            if i > 0 && i % DEADLINE_CHECK_INTERVAL == 0 {
                check_deadline(start, deadline)?;
            }
            let Some(scored) = score_candidate(candidate, &query, self.scorer.as_ref()) else {
                continue;
            };
            if match_mode == MatchMode::Any || scored.coverage == query.len() {
                matches.push(scored);
            }
        }
        sort_matches(&mut matches);

        let stats = SearchStats {
            lexemes: query.len(),
            candidates_considered: candidates.len(),
            elapsed_micros: elapsed_micros(start),
        };
        debug!(
            query = %request.query,
            lexemes = stats.lexemes,
            candidates = stats.candidates_considered,
            matches = matches.len(),
            scorer = self.scorer.name(),
            elapsed_us = stats.elapsed_micros,
            "search executed"
        );

        Ok(SearchResponse { matches, stats })
    }
}

impl std::fmt::Debug for SearchFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchFacade")
            .field("config", &self.config)
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

fn check_deadline(start: Instant, deadline: Option<Duration>) -> Result<()> {
    if let Some(deadline) = deadline {
        let elapsed = start.elapsed();
        if elapsed >= deadline {
            return Err(Error::Timeout { elapsed, deadline });
        }
    }
    Ok(())
}

fn elapsed_micros(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
}
