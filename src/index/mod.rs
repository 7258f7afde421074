//! Positional inverted index
//!
//! The in-memory half of the index: a concurrent map from stemmed term to
//! posting list, plus an occurrence counter. `add` is safe under
//! concurrent callers; the per-key shard lock serializes mutation of one
//! term's posting list and readers receive a snapshot, never a torn list.
//!
//! The durable half lives in the store; the indexer keeps both sides
//! consistent and can rebuild this structure from storage.

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// One term's occurrences within one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub page_id: i64,
    pub frequency: u32,
    /// Ascending zero-based token positions within the page's analyzed stream
    pub positions: Vec<u32>,
}

/// Concurrent term -> posting-list map
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: DashMap<String, Vec<Posting>>,
    total_occurrences: AtomicU64,
}

impl InvertedIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of `term` in `page_id` at `position`
    ///
    /// Creates the posting on first sight of the (term, page) pair. When
    /// callers feed tokens in scan order, each posting's position list
    /// stays non-decreasing.
    pub fn add(&self, term: &str, page_id: i64, position: u32) {
        let term = term.to_lowercase();
        let mut list = self.postings.entry(term).or_default();

        match list.iter_mut().find(|p| p.page_id == page_id) {
            Some(posting) => {
                posting.positions.push(position);
                posting.frequency += 1;
            }
            None => list.push(Posting {
                page_id,
                frequency: 1,
                positions: vec![position],
            }),
        }

        self.total_occurrences.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the posting list for a term (case-insensitive); empty on miss
    pub fn postings(&self, term: &str) -> Vec<Posting> {
        self.postings
            .get(&term.to_lowercase())
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Ids of pages containing every term (conjunctive)
    ///
    /// Short-circuits to empty on the first term with no postings. The
    /// result is sorted ascending.
    pub fn pages_containing_all(&self, terms: &[String]) -> Vec<i64> {
        if terms.is_empty() {
            return Vec::new();
        }

        let mut result: Option<HashSet<i64>> = None;
        for term in terms {
            let pages: HashSet<i64> = self.postings(term).iter().map(|p| p.page_id).collect();
            if pages.is_empty() {
                return Vec::new();
            }
            result = Some(match result {
                Some(acc) => acc.intersection(&pages).copied().collect(),
                None => pages,
            });
            if result.as_ref().map(|s| s.is_empty()).unwrap_or(true) {
                return Vec::new();
            }
        }

        let mut ids: Vec<i64> = result.unwrap_or_default().into_iter().collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of pages containing at least one term, sorted ascending
    pub fn pages_containing_any(&self, terms: &[String]) -> Vec<i64> {
        let mut ids: HashSet<i64> = HashSet::new();
        for term in terms {
            ids.extend(self.postings(term).iter().map(|p| p.page_id));
        }
        let mut ids: Vec<i64> = ids.into_iter().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of pages containing the term
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings
            .get(&term.to_lowercase())
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// Number of distinct terms in the index
    pub fn unique_terms(&self) -> usize {
        self.postings.len()
    }

    /// Total occurrences recorded across all postings
    pub fn total_occurrences(&self) -> u64 {
        self.total_occurrences.load(Ordering::Relaxed)
    }

    /// Removes every posting for one page, keeping counters consistent
    ///
    /// Used when a page is re-indexed so its stale occurrences do not
    /// linger alongside the rewritten durable rows.
    pub fn remove_page(&self, page_id: i64) {
        let mut removed: u64 = 0;
        self.postings.retain(|_, list| {
            if let Some(pos) = list.iter().position(|p| p.page_id == page_id) {
                removed += u64::from(list[pos].frequency);
                list.remove(pos);
            }
            !list.is_empty()
        });
        self.total_occurrences.fetch_sub(removed, Ordering::Relaxed);
    }

    /// Drops all postings and resets counters
    pub fn clear(&self) {
        self.postings.clear();
        self.total_occurrences.store(0, Ordering::Relaxed);
    }
}
