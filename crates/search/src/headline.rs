//! Search headlines: matched words highlighted in the original text
//!
//! A word is highlighted when it normalizes to one of the query lexemes, so
//! `forêts` is highlighted for the query `forêt`. Long texts are cut to a
//! window of `max_words` words that starts a little before the first match.

use std::sync::Arc;

use catalogue_core::HeadlineConfig;

use crate::normalizer::{AnalyzedWord, Normalizer};
use crate::query::ParsedQuery;

/// Words of context kept before the first match in a cut headline
const LEADING_WORDS: usize = 3;

/// Builds highlighted excerpts
#[derive(Debug, Clone)]
pub struct Highlighter {
    normalizer: Arc<Normalizer>,
    config: HeadlineConfig,
}

impl Highlighter {
    /// Highlighter sharing the index's normalizer
    pub fn new(normalizer: Arc<Normalizer>, config: HeadlineConfig) -> Self {
        Highlighter { normalizer, config }
    }

    /// Highlight `text` for `query`
    ///
    /// Returns `None` when no word of `text` matches the query.
    pub fn highlight(&self, text: &str, query: &ParsedQuery) -> Option<String> {
        if query.is_empty() {
            return None;
        }

        let words = self.normalizer.analyze(text);
        let is_match = |word: &AnalyzedWord<'_>| {
            word.lexeme
                .as_deref()
                .map_or(false, |lexeme| query.contains(lexeme))
        };
        let first_match = words.iter().position(is_match)?;

        let max_words = self.config.max_words.max(1);
        let (from, to, start_byte, end_byte) = if words.len() <= max_words {
            (0, words.len(), 0, text.len())
        } else {
            let from = first_match
                .saturating_sub(LEADING_WORDS)
                .min(words.len() - max_words);
            let to = from + max_words;
            (from, to, words[from].start, words[to - 1].end)
        };

        let mut out = String::with_capacity(end_byte - start_byte + 16);
        let mut cursor = start_byte;
        for word in words[from..to].iter().filter(|w| is_match(*w)) {
            out.push_str(&text[cursor..word.start]);
            out.push_str(&self.config.start_sel);
            out.push_str(word.word);
            out.push_str(&self.config.stop_sel);
            cursor = word.end;
        }
        out.push_str(&text[cursor..end_byte]);
        Some(out)
    }
}
