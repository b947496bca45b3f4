//! Search configuration via `catalogue.toml`
//!
//! Configuration is an explicit value handed to the normalizer, the index
//! and the search facade. Nothing reads it from ambient global state, so
//! several differently configured indexes can live in one process.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::locale::Locale;

/// Config file name placed next to the catalogue data.
pub const CONFIG_FILE_NAME: &str = "catalogue.toml";

/// How many query lexemes a document must match to be returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every query lexeme must be present (conjunctive)
    #[default]
    All,
    /// At least one query lexeme must be present; coverage is ranked
    Any,
}

/// Headline (highlighting) settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineConfig {
    /// Markup inserted before a matched word
    #[serde(default = "default_start_sel")]
    pub start_sel: String,
    /// Markup inserted after a matched word
    #[serde(default = "default_stop_sel")]
    pub stop_sel: String,
    /// Longest headline, in words
    #[serde(default = "default_max_words")]
    pub max_words: usize,
}

fn default_start_sel() -> String {
    "<b>".to_string()
}

fn default_stop_sel() -> String {
    "</b>".to_string()
}

fn default_max_words() -> usize {
    35
}

impl Default for HeadlineConfig {
    fn default() -> Self {
        HeadlineConfig {
            start_sel: default_start_sel(),
            stop_sel: default_stop_sel(),
            max_words: default_max_words(),
        }
    }
}

/// Search configuration loaded from `catalogue.toml`.
///
/// # Example
///
/// ```toml
/// locale = "french"
/// match_mode = "all"
/// title_body_gap = 100
///
/// [headline]
/// start_sel = "<mark>"
/// stop_sel = "</mark>"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Index and query locale
    #[serde(default)]
    pub locale: Locale,
    /// Conjunctive or disjunctive matching
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Words shorter than this many characters are not indexed
    #[serde(default = "default_min_token_chars")]
    pub min_token_chars: usize,
    /// Position gap between the last title word and the first body word
    #[serde(default = "default_title_body_gap")]
    pub title_body_gap: u32,
    /// Strip diacritics before stemming
    #[serde(default)]
    pub fold_diacritics: bool,
    /// Default search deadline in milliseconds (absent = no deadline)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_timeout_ms: Option<u64>,
    /// Highlighting settings
    #[serde(default)]
    pub headline: HeadlineConfig,
}

fn default_min_token_chars() -> usize {
    2
}

fn default_title_body_gap() -> u32 {
    100
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            locale: Locale::default(),
            match_mode: MatchMode::default(),
            min_token_chars: default_min_token_chars(),
            title_body_gap: default_title_body_gap(),
            fold_diacritics: false,
            search_timeout_ms: None,
            headline: HeadlineConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Builder: set locale
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Builder: set match mode
    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    /// Builder: enable or disable diacritic folding
    pub fn with_fold_diacritics(mut self, fold: bool) -> Self {
        self.fold_diacritics = fold;
        self
    }

    /// Builder: set the default search deadline
    ///
    /// The deadline is kept in whole milliseconds, rounded up, so a
    /// non-zero sub-millisecond timeout becomes 1 ms rather than 0.
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        let nanos = timeout.as_nanos();
        let millis = nanos / 1_000_000 + u128::from(nanos % 1_000_000 != 0);
        self.search_timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    /// Default search deadline, if any
    pub fn search_timeout(&self) -> Option<Duration> {
        self.search_timeout_ms.map(Duration::from_millis)
    }

    /// Check invariants the rest of the system relies on.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on a zero token length, a zero title/body gap
    /// or a zero headline length.
    pub fn validate(&self) -> Result<()> {
        if self.min_token_chars == 0 {
            return Err(Error::Config("min_token_chars must be at least 1".into()));
        }
        if self.title_body_gap == 0 {
            return Err(Error::Config(
                "title_body_gap must be at least 1 so title and body words are never adjacent"
                    .into(),
            ));
        }
        if self.headline.max_words == 0 {
            return Err(Error::Config("headline.max_words must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SearchConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse search config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Catalogue search configuration
#
# Text-search locale: "french" (default), "english" or "simple"
locale = "french"

# "all" = every query word must match (default)
# "any" = at least one query word must match, more matches rank higher
match_mode = "all"

# Words shorter than this are not indexed
min_token_chars = 2

# Position gap between title and description words
title_body_gap = 100

# Strip accents before stemming (applied to documents and queries alike)
fold_diacritics = false

# Default search deadline in milliseconds
# search_timeout_ms = 2000

[headline]
start_sel = "<b>"
stop_sel = "</b>"
max_words = 35
"#
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
