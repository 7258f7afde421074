//! Text analysis pipeline
//!
//! Three stages, all lowercased: tokenize with positions, drop stop
//! words (positions survive unrenumbered), stem with the Porter
//! algorithm. The same pipeline analyzes page content and queries; query
//! analysis additionally keeps the pre-stem surface forms for snippet
//! highlighting.

mod stemmer;
mod stopwords;
mod tokenizer;

pub use stemmer::{stem, PorterStemmer};
pub use stopwords::StopWordFilter;
pub use tokenizer::{tokenize, Token};

use crate::config::IndexerConfig;

/// Terms extracted from a query
#[derive(Debug, Clone, Default)]
pub struct QueryTerms {
    /// Stemmed terms for retrieval, deduplicated, in first-seen order
    pub stemmed: Vec<String>,
    /// Pre-stem lowercased terms for highlighting, deduplicated
    pub original: Vec<String>,
}

impl QueryTerms {
    pub fn is_empty(&self) -> bool {
        self.stemmed.is_empty()
    }
}

/// The analysis pipeline: tokenizer, stop-word gate, stemmer
#[derive(Debug, Clone)]
pub struct Analyzer {
    stop_words: StopWordFilter,
    min_word_length: usize,
    max_word_length: usize,
}

impl Analyzer {
    /// Creates an analyzer with the configured token length bounds
    pub fn new(config: &IndexerConfig) -> Self {
        Self {
            stop_words: StopWordFilter::from_resource(),
            min_word_length: config.min_word_length,
            max_word_length: config.max_word_length,
        }
    }

    /// Analyzes page text into stemmed, position-tagged tokens
    ///
    /// Output depends only on the input and the immutable stop-word set.
    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let tokens = tokenize(text, self.min_word_length, self.max_word_length);
        let mut surviving = self.stop_words.filter(tokens);

        let mut stemmer = PorterStemmer::new();
        for token in &mut surviving {
            token.text = stemmer.stem(&token.text);
        }
        surviving
    }

    /// Analyzes a query into retrieval stems and highlight surfaces
    ///
    /// Runs the same pipeline without position tracking. Both lists are
    /// deduplicated preserving first-seen order.
    pub fn analyze_query(&self, query: &str) -> QueryTerms {
        let tokens = tokenize(query, self.min_word_length, self.max_word_length);
        let mut stemmer = PorterStemmer::new();

        let mut terms = QueryTerms::default();
        for token in tokens {
            if self.stop_words.is_stop_word(&token.text) {
                continue;
            }
            if !terms.original.contains(&token.text) {
                terms.original.push(token.text.clone());
            }
            let stemmed = stemmer.stem(&token.text);
            if !terms.stemmed.contains(&stemmed) {
                terms.stemmed.push(stemmed);
            }
        }
        terms
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(&IndexerConfig::default())
    }
}
