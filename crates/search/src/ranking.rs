//! Ranking engine: coverage + proximity scoring
//!
//! Scoring is a pure function of a candidate and the query, behind the
//! `Scorer` trait. The default `ProximityScorer` computes
//!
//! ```text
//! score = coverage + 1 / (1 + span)
//! ```
//!
//! where `coverage` is the number of distinct query lexemes present and
//! `span` the smallest window of positions holding one occurrence of each of
//! them. The proximity term lies in `(0, 1]`, so coverage always dominates
//! and, at equal coverage, tighter matches win.
//!
//! Ordering is a total order: score descending, then coverage descending and
//! span ascending, then creation sequence, then id.

use std::cmp::Ordering;

use crate::index::Candidate;
use crate::query::ParsedQuery;
use catalogue_core::DocumentId;

// ============================================================================
// Scorer
// ============================================================================

/// Pluggable scoring function
pub trait Scorer: Send + Sync {
    /// Score a candidate against a query; higher is more relevant
    ///
    /// Must be deterministic and non-negative.
    fn score(&self, candidate: &Candidate, query: &ParsedQuery) -> f64;

    /// Name for debugging/logging
    fn name(&self) -> &str;
}

/// Default scorer: lexeme coverage first, positional proximity second
#[derive(Debug, Clone, Copy, Default)]
pub struct ProximityScorer;

impl Scorer for ProximityScorer {
    fn score(&self, candidate: &Candidate, _query: &ParsedQuery) -> f64 {
        let coverage = candidate.coverage();
        if coverage == 0 {
            return 0.0;
        }
        let span = candidate_span(candidate);
        coverage as f64 + 1.0 / (1.0 + f64::from(span))
    }

    fn name(&self) -> &str {
        "proximity"
    }
}

// ============================================================================
// ScoredMatch
// ============================================================================

/// A ranked search result
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    /// Matched document
    pub id: DocumentId,
    /// Relevance; higher is better
    pub score: f64,
    /// Distinct query lexemes matched
    pub coverage: usize,
    /// Smallest window covering every matched lexeme (0 for one lexeme)
    pub span: u32,
    /// Creation sequence of the document
    pub seq: u64,
}

impl ScoredMatch {
    /// Total order used for results
    ///
    /// Score first. Scores that compare equal fall back to the exact
    /// integer coverage and span, since `f64` cannot tell very long spans
    /// apart. Creation order and id make the order total.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.coverage.cmp(&self.coverage))
            .then_with(|| self.span.cmp(&other.span))
            .then_with(|| self.seq.cmp(&other.seq))
            .then_with(|| self.id.cmp(&other.id))
    }
}

// ============================================================================
// Ranking
// ============================================================================

/// Score one candidate; `None` if it matches no query lexeme
pub fn score_candidate(
    candidate: &Candidate,
    query: &ParsedQuery,
    scorer: &dyn Scorer,
) -> Option<ScoredMatch> {
    let coverage = candidate.coverage();
    if coverage == 0 {
        return None;
    }
    Some(ScoredMatch {
        id: candidate.id,
        score: scorer.score(candidate, query),
        coverage,
        span: candidate_span(candidate),
        seq: candidate.seq,
    })
}

/// Sort matches into final rank order
pub fn sort_matches(matches: &mut [ScoredMatch]) {
    matches.sort_by(ScoredMatch::rank_cmp);
}

/// Rank candidates against a query
///
/// Candidates matching no query lexeme are dropped. An empty query or an
/// empty candidate list gives an empty result.
pub fn rank(candidates: &[Candidate], query: &ParsedQuery, scorer: &dyn Scorer) -> Vec<ScoredMatch> {
    if query.is_empty() {
        return Vec::new();
    }
    let mut matches: Vec<ScoredMatch> = candidates
        .iter()
        .filter_map(|c| score_candidate(c, query, scorer))
        .collect();
    sort_matches(&mut matches);
    matches
}

fn candidate_span(candidate: &Candidate) -> u32 {
    let lists: Vec<&[u32]> = candidate
        .positions
        .iter()
        .filter(|p| !p.is_empty())
        .map(Vec::as_slice)
        .collect();
    min_cover_span(&lists)
}

/// Smallest `max - min` over windows holding one position from every list
///
/// Lists must be non-empty. Returns 0 for fewer than two lists.
pub fn min_cover_span(lists: &[&[u32]]) -> u32 {
    if lists.len() < 2 {
        return 0;
    }

    let mut events: Vec<(u32, usize)> = lists
        .iter()
        .enumerate()
        .flat_map(|(list, positions)| positions.iter().map(move |&p| (p, list)))
        .collect();
    events.sort_unstable();

    let mut counts = vec![0usize; lists.len()];
    let mut covered = 0;
    let mut best = u32::MAX;
    let mut left = 0;

    for &(right_pos, list) in &events {
        if counts[list] == 0 {
            covered += 1;
        }
        counts[list] += 1;

        while covered == lists.len() {
            let (left_pos, left_list) = events[left];
            best = best.min(right_pos - left_pos);
            counts[left_list] -= 1;
            if counts[left_list] == 0 {
                covered -= 1;
            }
            left += 1;
        }
    }

    if best == u32::MAX {
        0
    } else {
        best
    }
}
