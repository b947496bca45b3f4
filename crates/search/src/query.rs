//! Query parser: raw user input → ParsedQuery
//!
//! The parser goes through the same `Normalizer` as indexing, so a word
//! always maps to the same lexeme on both sides.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::normalizer::Normalizer;

/// Ordered, deduplicated query lexemes
///
/// An empty query matches no documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    lexemes: Vec<String>,
}

impl ParsedQuery {
    /// Build from lexemes, keeping the first occurrence of each
    pub fn new<I, S>(lexemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = FxHashSet::default();
        let lexemes = lexemes
            .into_iter()
            .map(Into::into)
            .filter(|l: &String| seen.insert(l.clone()))
            .collect();
        ParsedQuery { lexemes }
    }

    /// The empty query
    pub fn empty() -> Self {
        Self::default()
    }

    /// Lexemes in first-occurrence order
    pub fn lexemes(&self) -> &[String] {
        &self.lexemes
    }

    /// Index of a lexeme in the query
    pub fn index_of(&self, lexeme: &str) -> Option<usize> {
        self.lexemes.iter().position(|l| l == lexeme)
    }

    /// Whether the query contains a lexeme
    pub fn contains(&self, lexeme: &str) -> bool {
        self.index_of(lexeme).is_some()
    }

    /// Number of distinct lexemes
    pub fn len(&self) -> usize {
        self.lexemes.len()
    }

    /// Whether the query has no lexemes
    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty()
    }
}

/// Parses raw query strings
#[derive(Debug, Clone)]
pub struct QueryParser {
    normalizer: Arc<Normalizer>,
}

impl QueryParser {
    /// Parser sharing the index's normalizer
    pub fn new(normalizer: Arc<Normalizer>) -> Self {
        QueryParser { normalizer }
    }

    /// Parse a raw query
    ///
    /// Never fails: punctuation, symbols and unknown words produce no
    /// lexemes, and the worst case is an empty query.
    pub fn parse(&self, raw: &str) -> ParsedQuery {
        ParsedQuery::new(self.normalizer.normalize(raw).into_iter().map(|l| l.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogue_core::SearchConfig;

    fn parser() -> QueryParser {
        QueryParser::new(Arc::new(Normalizer::new(&SearchConfig::default())))
    }

    #[test]
    fn test_parse_two_lexemes() {
        let query = parser().parse("Forêt ancienne");
        assert_eq!(query.lexemes(), &["forêt".to_string(), "ancien".to_string()]);
    }

    #[test]
    fn test_duplicates_collapse_in_order() {
        let query = parser().parse("anciennes forêts, ancienne forêt");
        assert_eq!(query.lexemes(), &["ancien".to_string(), "forêt".to_string()]);
    }

    #[test]
    fn test_empty_and_garbage() {
        assert!(parser().parse("").is_empty());
        assert!(parser().parse("   ").is_empty());
        assert!(parser().parse("& || ... ?!").is_empty());
        assert!(parser().parse("de la des").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(parser().parse("BaSe"), parser().parse("base"));
    }

    #[test]
    fn test_index_of() {
        let query = ParsedQuery::new(["a1", "b2", "a1"]);
        assert_eq!(query.len(), 2);
        assert_eq!(query.index_of("b2"), Some(1));
        assert!(!query.contains("c3"));
    }
}
