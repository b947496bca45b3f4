//! Text-search locale
//!
//! One locale is configured per index. It selects the stopword list, the
//! elision rules and the Snowball stemmer used by the normalizer, both at
//! index time and at query time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Language configuration of a search index
///
/// Names follow the text-search configuration names of PostgreSQL
/// (`french`, `english`, `simple`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// French stopwords, elision and Snowball stemmer
    #[default]
    French,
    /// English stopwords, possessive stripping and Snowball stemmer
    English,
    /// Lowercasing only: no stopwords, no stemming
    Simple,
}

impl Locale {
    /// All supported locales
    pub fn all() -> &'static [Locale] {
        &[Locale::French, Locale::English, Locale::Simple]
    }

    /// Configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::French => "french",
            Locale::English => "english",
            Locale::Simple => "simple",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "french" | "fr" => Ok(Locale::French),
            "english" | "en" => Ok(Locale::English),
            "simple" => Ok(Locale::Simple),
            other => Err(Error::InvalidInput(format!(
                "unsupported locale '{}', expected one of: french, english, simple",
                other
            ))),
        }
    }
}
