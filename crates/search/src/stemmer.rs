//! Stemmers reducing inflected words to a shared root
//!
//! The normalizer only talks to the `Stemmer` trait, so the algorithm can
//! be swapped per locale or replaced in tests.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use rust_stemmers::Algorithm;

use catalogue_core::Locale;

/// Reduces a lowercased word to its stem
pub trait Stemmer: Send + Sync {
    /// Stem a single lowercased word
    fn stem<'a>(&self, word: &'a str) -> Cow<'a, str>;

    /// Name for debugging/logging
    fn name(&self) -> &'static str;
}

/// Snowball stemmer from `rust-stemmers`
pub struct SnowballStemmer {
    name: &'static str,
    inner: rust_stemmers::Stemmer,
}

impl SnowballStemmer {
    /// Stemmer for an arbitrary Snowball algorithm
    pub fn new(algorithm: Algorithm, name: &'static str) -> Self {
        SnowballStemmer {
            name,
            inner: rust_stemmers::Stemmer::create(algorithm),
        }
    }

    /// French Snowball stemmer
    pub fn french() -> Self {
        Self::new(Algorithm::French, "snowball_french")
    }

    /// English (Porter2) Snowball stemmer
    pub fn english() -> Self {
        Self::new(Algorithm::English, "snowball_english")
    }
}

impl Stemmer for SnowballStemmer {
    fn stem<'a>(&self, word: &'a str) -> Cow<'a, str> {
        self.inner.stem(word)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowballStemmer")
            .field("name", &self.name)
            .finish()
    }
}

/// Identity stemmer for the `simple` locale
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStemmer;

impl Stemmer for NoopStemmer {
    fn stem<'a>(&self, word: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(word)
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Default stemmer of a locale
pub fn for_locale(locale: Locale) -> Arc<dyn Stemmer> {
    match locale {
        Locale::French => Arc::new(SnowballStemmer::french()),
        Locale::English => Arc::new(SnowballStemmer::english()),
        Locale::Simple => Arc::new(NoopStemmer),
    }
}
