//! Ranked retrieval over the inverted index
//!
//! Queries run through the same analysis pipeline as pages, retrieve
//! conjunctively (every stemmed term must match), and rank by TF-IDF.
//! Ranking is deterministic: score descending, ties broken by ascending
//! page id. Store failures surface as an empty result list with a logged
//! cause.

mod snippet;

pub use snippet::make_snippet;

use crate::analyzer::Analyzer;
use crate::config::SearchConfig;
use crate::index::InvertedIndex;
use crate::storage::Store;
use std::collections::HashMap;
use std::sync::Arc;

/// One ranked search hit
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub page_id: i64,
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub score: f64,
    /// 1-based position in the ranked list
    pub rank: usize,
}

/// Query engine over the in-memory index and the store
pub struct SearchEngine {
    index: Arc<InvertedIndex>,
    store: Store,
    analyzer: Arc<Analyzer>,
    config: SearchConfig,
}

impl SearchEngine {
    /// Creates a search engine
    pub fn new(
        index: Arc<InvertedIndex>,
        store: Store,
        analyzer: Arc<Analyzer>,
        config: SearchConfig,
    ) -> Self {
        Self {
            index,
            store,
            analyzer,
            config,
        }
    }

    /// Searches with the configured result limit
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        self.search_with_limit(query, self.config.max_results)
    }

    /// Searches, returning at most `limit` ranked results
    ///
    /// An empty or all-stop-word query returns an empty list without
    /// touching the store.
    pub fn search_with_limit(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let mut results = self.ranked_results(query);
        results.truncate(limit);
        results
    }

    /// Returns one page of the ranked result list
    ///
    /// Pages are 1-based; ranks are global across the full ranking, so
    /// page 2 with size 10 carries ranks 11..20.
    pub fn search_paginated(
        &self,
        query: &str,
        page: usize,
        page_size: usize,
    ) -> Vec<SearchResult> {
        if page == 0 || page_size == 0 {
            return Vec::new();
        }

        let results = self.ranked_results(query);
        results
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect()
    }

    /// Full ranked candidate list for a query
    fn ranked_results(&self, query: &str) -> Vec<SearchResult> {
        let terms = self.analyzer.analyze_query(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let candidates = self.index.pages_containing_all(&terms.stemmed);
        if candidates.is_empty() {
            return Vec::new();
        }

        let total_pages = match self.store.count_pages() {
            Ok(n) => n,
            Err(e) => {
                tracing::error!("Search failed to count pages: {}", e);
                return Vec::new();
            }
        };
        let n = total_pages.max(1) as f64;

        // Per-term idf and per-page frequency, one posting-list pass each.
        let mut term_stats: Vec<(f64, HashMap<i64, u32>)> = Vec::new();
        for term in &terms.stemmed {
            let postings = self.index.postings(term);
            let df = postings.len();
            if df == 0 {
                return Vec::new();
            }
            let idf = (n / df as f64).ln();
            let frequencies: HashMap<i64, u32> =
                postings.iter().map(|p| (p.page_id, p.frequency)).collect();
            term_stats.push((idf, frequencies));
        }

        let mut results = Vec::with_capacity(candidates.len());
        for page_id in candidates {
            let page = match self.store.get_page(page_id) {
                Ok(Some(p)) => p,
                Ok(None) => {
                    tracing::warn!("Indexed page {} missing from store", page_id);
                    continue;
                }
                Err(e) => {
                    tracing::error!("Search failed to load page {}: {}", page_id, e);
                    continue;
                }
            };

            let score = if page.word_count == 0 {
                0.0
            } else {
                term_stats
                    .iter()
                    .map(|(idf, frequencies)| {
                        let frequency = frequencies.get(&page_id).copied().unwrap_or(0);
                        (f64::from(frequency) / f64::from(page.word_count)) * idf
                    })
                    .sum()
            };

            let snippet = make_snippet(&page.body, &terms.original, self.config.snippet_length);

            results.push(SearchResult {
                page_id,
                url: page.url,
                title: page.title,
                snippet,
                score,
                rank: 0,
            });
        }

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.page_id.cmp(&b.page_id))
        });
        for (i, result) in results.iter_mut().enumerate() {
            result.rank = i + 1;
        }
        results
    }
}
