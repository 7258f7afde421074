//! Stop-word filtering
//!
//! The word list ships with the binary as a text resource (one word per
//! line, `#` comments allowed). Should the resource ever parse to nothing,
//! a small built-in list takes over so filtering never silently vanishes.

use crate::analyzer::tokenizer::Token;
use std::collections::HashSet;

/// Minimal fallback list used when the bundled resource yields no words
const FALLBACK_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with",
];

/// Set of words excluded from indexing and queries
#[derive(Debug, Clone)]
pub struct StopWordFilter {
    words: HashSet<String>,
}

impl StopWordFilter {
    /// Loads the bundled stop-word resource
    pub fn from_resource() -> Self {
        Self::from_content(include_str!("stopwords.txt"))
    }

    /// Parses a stop-word list: one word per line, `#` starts a comment
    ///
    /// Falls back to the built-in list when nothing usable is found.
    pub fn from_content(content: &str) -> Self {
        let mut words: HashSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.to_lowercase())
            .collect();

        if words.is_empty() {
            tracing::warn!("Stop-word list empty, using built-in fallback");
            words = FALLBACK_STOP_WORDS.iter().map(|w| w.to_string()).collect();
        }

        Self { words }
    }

    /// True when the lowercased form of `word` is a stop word
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Drops stop-word tokens, preserving the positions of survivors
    pub fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter(|t| !self.words.contains(&t.text))
            .collect()
    }

    /// Number of words in the set
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the set is empty (cannot happen through the constructors)
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWordFilter {
    fn default() -> Self {
        Self::from_resource()
    }
}
