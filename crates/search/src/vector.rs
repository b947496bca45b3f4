//! Position-tagged search vector
//!
//! A `SearchVector` maps each lexeme of a document to the sorted positions
//! where it occurs. It is derived from title and body at write time and
//! never set by callers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lexeme → sorted, deduplicated positions (1-based)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchVector {
    entries: BTreeMap<String, Vec<u32>>,
}

impl SearchVector {
    /// Create an empty vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `lexeme` at `position`
    pub fn push(&mut self, lexeme: impl Into<String>, position: u32) {
        let positions = self.entries.entry(lexeme.into()).or_default();
        if let Err(idx) = positions.binary_search(&position) {
            positions.insert(idx, position);
        }
    }

    /// Positions of a lexeme, if present
    pub fn positions(&self, lexeme: &str) -> Option<&[u32]> {
        self.entries.get(lexeme).map(Vec::as_slice)
    }

    /// Whether the vector contains a lexeme
    pub fn contains(&self, lexeme: &str) -> bool {
        self.entries.contains_key(lexeme)
    }

    /// Lexemes in sorted order
    pub fn lexemes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(lexeme, positions)` pairs in lexeme order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.entries
            .iter()
            .map(|(lexeme, positions)| (lexeme.as_str(), positions.as_slice()))
    }

    /// Number of distinct lexemes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vector has no lexemes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for SearchVector {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut vector = SearchVector::new();
        for (lexeme, position) in iter {
            vector.push(lexeme, position);
        }
        vector
    }
}

/// tsvector-like rendering: `'ancien':4 'forêt':3,9`
impl fmt::Display for SearchVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (lexeme, positions)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "'{}':", lexeme)?;
            for (j, position) in positions.iter().enumerate() {
                if j > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", position)?;
            }
        }
        Ok(())
    }
}
