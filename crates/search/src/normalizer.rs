//! Lexeme normalizer: raw text → stemmed, position-tagged lexemes
//!
//! Pipeline per word:
//! UAX#29 word boundaries → lowercase → strip elisions / possessives
//! → remove non-alphanumeric → (fold diacritics) → filter short tokens
//! → remove stopwords → stem
//!
//! Every word consumes a position, including the ones dropped as stopwords
//! or short tokens, so positions keep reflecting word distance in the text.

use std::fmt;
use std::sync::Arc;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use catalogue_core::{Locale, SearchConfig};

use crate::stemmer::{self, Stemmer};
use crate::stopwords::is_stopword;
use crate::vector::SearchVector;

/// French elided articles and pronouns (without the apostrophe).
const FRENCH_ELISIONS: &[&str] = &[
    "l", "d", "qu", "j", "m", "n", "s", "t", "c", "jusqu", "lorsqu", "puisqu",
];

/// A normalized lexeme with its 1-based position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lexeme {
    /// Stemmed, lowercased form
    pub text: String,
    /// 1-based word position
    pub position: u32,
}

/// One word of an analyzed text, with its byte range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedWord<'t> {
    /// The word as it appears in the text
    pub word: &'t str,
    /// Byte offset of the word's first byte
    pub start: usize,
    /// Byte offset one past the word's last byte
    pub end: usize,
    /// 1-based word position
    pub position: u32,
    /// Lexeme, or `None` if the word was dropped
    pub lexeme: Option<String>,
}

/// Turns text into lexemes for one locale
///
/// Shared by indexing, query parsing and highlighting so that all three
/// agree on what a lexeme is.
#[derive(Clone)]
pub struct Normalizer {
    locale: Locale,
    min_token_chars: usize,
    title_body_gap: u32,
    fold_diacritics: bool,
    stemmer: Arc<dyn Stemmer>,
}

impl Normalizer {
    /// Normalizer for a config, using the locale's default stemmer
    pub fn new(config: &SearchConfig) -> Self {
        Self::with_stemmer(config, stemmer::for_locale(config.locale))
    }

    /// Normalizer with an explicit stemmer
    pub fn with_stemmer(config: &SearchConfig, stemmer: Arc<dyn Stemmer>) -> Self {
        Normalizer {
            locale: config.locale,
            min_token_chars: config.min_token_chars.max(1),
            title_body_gap: config.title_body_gap,
            fold_diacritics: config.fold_diacritics,
            stemmer,
        }
    }

    /// Locale this normalizer was built for
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Normalize a single word, or `None` if it yields no lexeme
    pub fn normalize_word(&self, word: &str) -> Option<String> {
        let lowered = word.to_lowercase();
        let stripped = match self.locale {
            Locale::French => strip_elision(&lowered),
            Locale::English => strip_possessive(&lowered),
            Locale::Simple => lowered.as_str(),
        };

        let cleaned: String = stripped.chars().filter(|c| c.is_alphanumeric()).collect();
        if cleaned.chars().count() < self.min_token_chars {
            return None;
        }
        if is_stopword(self.locale, &cleaned) {
            return None;
        }

        let folded = if self.fold_diacritics {
            fold_diacritics(&cleaned)
        } else {
            cleaned
        };

        let stem = self.stemmer.stem(&folded);
        if stem.is_empty() {
            None
        } else {
            Some(stem.into_owned())
        }
    }

    /// Split text into words with byte offsets, positions and lexemes
    pub fn analyze<'t>(&self, text: &'t str) -> Vec<AnalyzedWord<'t>> {
        text.unicode_word_indices()
            .enumerate()
            .map(|(idx, (start, word))| AnalyzedWord {
                word,
                start,
                end: start + word.len(),
                position: to_position(idx),
                lexeme: self.normalize_word(word),
            })
            .collect()
    }

    /// Normalize text into `(lexeme, position)` pairs in word order
    ///
    /// Punctuation and symbols never fail; they simply produce nothing.
    pub fn normalize(&self, text: &str) -> Vec<Lexeme> {
        text.unicode_words()
            .enumerate()
            .filter_map(|(idx, word)| {
                self.normalize_word(word).map(|text| Lexeme {
                    text,
                    position: to_position(idx),
                })
            })
            .collect()
    }

    /// Build the search vector of a document
    ///
    /// Title words are numbered from 1; body words continue after the title
    /// plus `title_body_gap`, so a title word and a body word are never
    /// adjacent.
    pub fn normalize_document(&self, title: &str, body: &str) -> SearchVector {
        let title_words = title.unicode_words().count();
        let body_offset = u32::try_from(title_words)
            .unwrap_or(u32::MAX)
            .saturating_add(self.title_body_gap);

        let mut vector = SearchVector::new();
        for lexeme in self.normalize(title) {
            vector.push(lexeme.text, lexeme.position);
        }
        for lexeme in self.normalize(body) {
            vector.push(lexeme.text, body_offset.saturating_add(lexeme.position));
        }
        vector
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("locale", &self.locale)
            .field("min_token_chars", &self.min_token_chars)
            .field("title_body_gap", &self.title_body_gap)
            .field("fold_diacritics", &self.fold_diacritics)
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

/// Normalize text with the default settings of `locale`
///
/// # Example
///
/// ```
/// use catalogue_core::Locale;
/// use catalogue_search::normalizer::normalize;
///
/// let lexemes: Vec<_> = normalize("Les forêts anciennes", Locale::French)
///     .into_iter()
///     .map(|l| (l.text, l.position))
///     .collect();
/// assert_eq!(lexemes, vec![("forêt".to_string(), 2), ("ancien".to_string(), 3)]);
/// ```
pub fn normalize(text: &str, locale: Locale) -> Vec<Lexeme> {
    Normalizer::new(&SearchConfig::default().with_locale(locale)).normalize(text)
}

/// 0-based word index → 1-based position
fn to_position(idx: usize) -> u32 {
    u32::try_from(idx).map_or(u32::MAX, |i| i.saturating_add(1))
}

/// Strip a leading French elision (`l'`, `d'`, `qu'` …).
fn strip_elision(word: &str) -> &str {
    for apostrophe in ['\'', '\u{2019}'] {
        if let Some((head, tail)) = word.split_once(apostrophe) {
            if FRENCH_ELISIONS.contains(&head) {
                return tail;
            }
        }
    }
    word
}

/// Strip English possessive suffix (`'s` / `\u{2019}s`).
#[inline]
fn strip_possessive(word: &str) -> &str {
    word.strip_suffix("'s")
        .or_else(|| word.strip_suffix("\u{2019}s"))
        .unwrap_or(word)
}

/// Decompose and drop combining marks: `forêt` → `foret`.
fn fold_diacritics(word: &str) -> String {
    word.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn french() -> Normalizer {
        Normalizer::new(&SearchConfig::default())
    }

    fn texts(lexemes: Vec<Lexeme>) -> Vec<String> {
        lexemes.into_iter().map(|l| l.text).collect()
    }

    fn lexeme(word: &str) -> String {
        french().normalize_word(word).unwrap()
    }

    #[test]
    fn test_stopwords_keep_their_position() {
        let lexemes = french().normalize("Historique des forêts anciennes");
        let pairs: Vec<_> = lexemes.iter().map(|l| (l.text.clone(), l.position)).collect();
        assert_eq!(
            pairs,
            vec![
                (lexeme("Historique"), 1),
                ("forêt".to_string(), 3),
                ("ancien".to_string(), 4)
            ]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(texts(french().normalize("BaSe")), texts(french().normalize("base")));
    }

    #[test]
    fn test_elision_stripped() {
        assert_eq!(texts(french().normalize("l'ADEME")), vec![lexeme("ADEME")]);
        assert_eq!(
            texts(french().normalize("l\u{2019}ADEME")),
            texts(french().normalize("ADEME"))
        );
        assert_eq!(
            texts(french().normalize("d'inventaire")),
            texts(french().normalize("inventaire"))
        );
    }

    #[test]
    fn test_short_tokens_dropped() {
        let lexemes = french().normalize("A x forêt");
        assert_eq!(lexemes.len(), 1);
        assert_eq!(lexemes[0].position, 3);
    }

    #[test]
    fn test_garbage_yields_nothing_matching() {
        assert!(french().normalize("").is_empty());
        assert!(french().normalize("...---... & || @@").is_empty());
    }

    #[test]
    fn test_english_possessive() {
        let normalizer = Normalizer::new(&SearchConfig::default().with_locale(Locale::English));
        assert_eq!(
            texts(normalizer.normalize("The forest's edge")),
            texts(normalizer.normalize("forest edge"))
        );
        assert_eq!(normalizer.normalize("The forest's")[0].text, "forest");
    }

    #[test]
    fn test_simple_locale_keeps_words() {
        let normalizer = Normalizer::new(&SearchConfig::default().with_locale(Locale::Simple));
        assert_eq!(
            texts(normalizer.normalize("Les Forêts")),
            vec!["les", "forêts"]
        );
    }

    #[test]
    fn test_fold_diacritics() {
        let normalizer = Normalizer::new(&SearchConfig::default().with_fold_diacritics(true));
        assert_eq!(
            texts(normalizer.normalize("forêt")),
            texts(normalizer.normalize("foret"))
        );
        // Stopword check happens before folding
        assert!(normalizer.normalize("été").is_empty());
    }

    #[test]
    fn test_min_token_chars_counts_chars_not_bytes() {
        let config = SearchConfig {
            min_token_chars: 3,
            ..SearchConfig::default()
        };
        let normalizer = Normalizer::new(&config);
        // "çà" is two chars but four bytes
        assert!(normalizer.normalize_word("çà").is_none());
    }

    #[test]
    fn test_document_positions_separate_title_and_body() {
        let vector = french().normalize_document("C", "Historique des forêts anciennes");
        // Title has one word, so body word 1 sits at 1 + 100 + 1
        assert_eq!(vector.positions(&lexeme("Historique")), Some(&[102][..]));
        assert_eq!(vector.positions("forêt"), Some(&[104][..]));
        assert_eq!(vector.positions("ancien"), Some(&[105][..]));
    }

    #[test]
    fn test_document_merges_title_and_body_positions() {
        let vector = french().normalize_document("Cadastre national", "Base de données du cadastre");
        assert_eq!(vector.positions(&lexeme("cadastre")), Some(&[1, 107][..]));
        assert_eq!(vector.positions(&lexeme("national")), Some(&[2][..]));
    }

    #[test]
    fn test_analyze_offsets() {
        let text = "Forêt, ancienne!";
        let words = french().analyze(text);
        assert_eq!(words.len(), 2);
        assert_eq!(&text[words[0].start..words[0].end], "Forêt");
        assert_eq!(words[1].word, "ancienne");
        assert_eq!(words[1].position, 2);
        assert_eq!(words[1].lexeme.as_deref(), Some("ancien"));
    }

    #[test]
    fn test_free_function_uses_locale() {
        assert_eq!(texts(normalize("the forests", Locale::English)), vec!["forest"]);
    }
}
