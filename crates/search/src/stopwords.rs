//! Stopword lists per locale
//!
//! The French list is the Snowball French stopword list; the English list is
//! Lucene's default set. The `simple` locale has no stopwords.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

use catalogue_core::Locale;

const FRENCH: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "et", "eux", "il",
    "ils", "je", "la", "le", "les", "leur", "lui", "ma", "mais", "me", "même", "mes", "moi", "mon",
    "ne", "nos", "notre", "nous", "on", "ou", "par", "pas", "pour", "qu", "que", "qui", "sa", "se",
    "ses", "son", "sur", "ta", "te", "tes", "toi", "ton", "tu", "un", "une", "vos", "votre",
    "vous", "c", "d", "j", "l", "à", "m", "n", "s", "t", "y", "été", "étée", "étées", "étés",
    "étant", "étante", "étants", "étantes", "suis", "es", "est", "sommes", "êtes", "sont",
    "serai", "seras", "sera", "serons", "serez", "seront", "serais", "serait", "serions",
    "seriez", "seraient", "étais", "était", "étions", "étiez", "étaient", "fus", "fut", "fûmes",
    "fûtes", "furent", "sois", "soit", "soyons", "soyez", "soient", "fusse", "fusses", "fût",
    "fussions", "fussiez", "fussent", "ayant", "ayante", "ayantes", "ayants", "eu", "eue",
    "eues", "eus", "ai", "as", "avons", "avez", "ont", "aurai", "auras", "aura", "aurons",
    "aurez", "auront", "aurais", "aurait", "aurions", "auriez", "auraient", "avais", "avait",
    "avions", "aviez", "avaient", "eut", "eûmes", "eûtes", "eurent", "aie", "aies", "ait",
    "ayons", "ayez", "aient", "eusse", "eusses", "eût", "eussions", "eussiez", "eussent",
];

const ENGLISH: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

static FRENCH_SET: Lazy<FxHashSet<&'static str>> = Lazy::new(|| FRENCH.iter().copied().collect());
static ENGLISH_SET: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| ENGLISH.iter().copied().collect());

/// Check if a lowercased word is a stopword of `locale`.
#[inline]
pub fn is_stopword(locale: Locale, word: &str) -> bool {
    match locale {
        Locale::French => FRENCH_SET.contains(word),
        Locale::English => ENGLISH_SET.contains(word),
        Locale::Simple => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_french_stopwords() {
        for word in ["de", "la", "des", "du", "été", "à"] {
            assert!(is_stopword(Locale::French, word), "{}", word);
        }
        assert!(!is_stopword(Locale::French, "forêt"));
        assert!(!is_stopword(Locale::French, "the"));
    }

    #[test]
    fn test_english_stopwords() {
        assert!(is_stopword(Locale::English, "the"));
        assert!(!is_stopword(Locale::English, "de"));
    }

    #[test]
    fn test_simple_has_no_stopwords() {
        assert!(!is_stopword(Locale::Simple, "the"));
        assert!(!is_stopword(Locale::Simple, "de"));
    }
}
