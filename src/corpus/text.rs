// Text normalization shared by every summarizer and metric.
//
// Review lines are case-folded and whitespace-collapsed before anything else
// looks at them. Strategies that work on bare words (graph, TF-IDF) also strip
// punctuation; strategies that vectorize sentences drop stop words and stem.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static STOP_WORDS: LazyLock<HashSet<String>> =
    LazyLock::new(|| get(LANGUAGE::English).into_iter().collect());

/// English stop words from the stop-words crate, as a lookup set.
pub fn english_stop_words() -> &'static HashSet<String> {
    &STOP_WORDS
}

/// Lowercase a line and collapse every whitespace run into a single space.
pub fn clean_line(line: &str) -> String {
    let lower = line.to_lowercase();
    WHITESPACE.replace_all(lower.trim(), " ").into_owned()
}

/// Remove every character that is neither a word character nor whitespace.
///
/// Word characters are Unicode alphanumerics plus underscore, so accented
/// letters survive while apostrophes, commas and periods do not
/// ("it's great." -> "its great").
pub fn strip_punctuation(line: &str) -> String {
    line.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect()
}

/// Clean a line for word-level strategies: case fold, drop punctuation,
/// collapse whitespace.
pub fn clean_bare(line: &str) -> String {
    clean_line(&strip_punctuation(line))
}

/// Split text into words using Unicode word boundaries.
pub fn tokenize(line: &str) -> Vec<String> {
    line.unicode_words().map(str::to_string).collect()
}

/// Tokenize and drop English stop words.
pub fn content_tokens(line: &str) -> Vec<String> {
    let stop_words = english_stop_words();
    line.unicode_words()
        .filter(|w| !stop_words.contains(*w))
        .map(str::to_string)
        .collect()
}

/// Stem tokens with the Snowball English stemmer (e.g. "generously" -> "generous").
pub fn stem_tokens(tokens: &[String]) -> Vec<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    tokens
        .iter()
        .map(|t| stemmer.stem(t).into_owned())
        .collect()
}

/// Full sentence preprocessing for vector-space strategies: clean, drop stop
/// words, stem, and rejoin with single spaces.
pub fn normalize_for_vectors(line: &str) -> String {
    stem_tokens(&content_tokens(&clean_line(line))).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_line_collapses_whitespace() {
        assert_eq!(clean_line("  The Screen\tis   GREAT \n"), "the screen is great");
    }

    #[test]
    fn test_strip_punctuation_keeps_words() {
        assert_eq!(strip_punctuation("it's great, really!"), "its great really");
    }

    #[test]
    fn test_clean_bare() {
        assert_eq!(clean_bare("Battery -- LIFE is short!!"), "battery life is short");
    }

    #[test]
    fn test_content_tokens_drops_stop_words() {
        let tokens = content_tokens("the battery is in the charger");
        assert!(tokens.contains(&"battery".to_string()));
        assert!(tokens.contains(&"charger".to_string()));
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
    }

    #[test]
    fn test_stem_tokens() {
        let stems = stem_tokens(&["running".to_string(), "batteries".to_string()]);
        assert_eq!(stems, vec!["run".to_string(), "batteri".to_string()]);
    }

    #[test]
    fn test_normalize_for_vectors() {
        let normalized = normalize_for_vectors("The Batteries are Running");
        assert!(normalized.contains("batteri"));
        assert!(normalized.contains("run"));
        assert!(!normalized.contains("the"));
    }
}
