//! Indexer: populates the inverted index from stored pages
//!
//! Page text flows through the analyzer into the in-memory index and, in
//! the same pass, into the durable postings table. Both representations
//! of the index are kept consistent by routing every mutation through
//! this module; the in-memory side can always be rebuilt from storage.

use crate::analyzer::Analyzer;
use crate::index::InvertedIndex;
use crate::storage::{PageRecord, Store, StoreResult};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Drives analysis and index population for stored pages
pub struct Indexer {
    store: Store,
    index: Arc<InvertedIndex>,
    analyzer: Arc<Analyzer>,
}

impl Indexer {
    /// Creates an indexer over a store, an index, and an analyzer
    pub fn new(store: Store, index: Arc<InvertedIndex>, analyzer: Arc<Analyzer>) -> Self {
        Self {
            store,
            index,
            analyzer,
        }
    }

    /// Indexes one stored page
    ///
    /// The analyzed stream is `title + " " + body`, so title tokens take
    /// the lowest positions. Every surviving token lands in the in-memory
    /// index; the page's postings are then written to storage in one
    /// transaction and its word count is set to the number of tokens that
    /// survived stop-word filtering.
    ///
    /// # Returns
    ///
    /// The number of indexed tokens.
    pub fn index_page(&self, page: &PageRecord) -> StoreResult<usize> {
        let stream = format!("{} {}", page.title, page.body);
        let tokens = self.analyzer.analyze(&stream);

        let mut groups: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        for token in &tokens {
            let position = token.position as u32;
            self.index.add(&token.text, page.id, position);
            groups.entry(token.text.clone()).or_default().push(position);
        }

        self.store.write_page_postings(page.id, &groups)?;
        self.store
            .update_page_word_count(page.id, tokens.len() as u32)?;

        tracing::debug!(
            "Indexed page {} ({}): {} tokens, {} terms",
            page.id,
            page.url,
            tokens.len(),
            groups.len()
        );

        Ok(tokens.len())
    }

    /// Re-indexes a page from its stored content
    ///
    /// Existing postings for the page are removed from both index halves
    /// before the rewrite, so running this twice leaves the store exactly
    /// as one run does.
    pub fn reindex_page(&self, page_id: i64) -> StoreResult<usize> {
        let Some(page) = self.store.get_page(page_id)? else {
            tracing::warn!("Cannot reindex page {}: not stored", page_id);
            return Ok(0);
        };

        self.store.delete_postings_for_page(page_id)?;
        self.index.remove_page(page_id);
        self.index_page(&page)
    }

    /// Indexes every stored page, returning the number of successes
    ///
    /// A page that fails to index is logged and skipped; it does not stop
    /// the pass.
    pub fn index_all_pages(&self) -> StoreResult<usize> {
        let pages = self.store.list_pages()?;
        let total = pages.len();
        let mut indexed = 0;

        for page in &pages {
            match self.index_page(page) {
                Ok(_) => indexed += 1,
                Err(e) => {
                    tracing::error!("Failed to index page {} ({}): {}", page.id, page.url, e);
                }
            }
        }

        tracing::info!("Indexed {}/{} pages", indexed, total);
        Ok(indexed)
    }

    /// Rebuilds the in-memory index from the durable postings
    ///
    /// # Returns
    ///
    /// The number of posting rows loaded.
    pub fn rebuild_index(&self) -> StoreResult<u64> {
        self.index.clear();

        let rows = self.store.load_postings()?;
        let count = rows.len() as u64;
        for row in rows {
            for position in row.positions {
                self.index.add(&row.term, row.page_id, position);
            }
        }

        tracing::debug!(
            "Rebuilt in-memory index: {} postings, {} terms",
            count,
            self.index.unique_terms()
        );
        Ok(count)
    }

    /// The in-memory index this indexer feeds
    pub fn index(&self) -> &Arc<InvertedIndex> {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::NewPage;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Store, Indexer) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("test.db"), 2).unwrap();
        let indexer = Indexer::new(
            store.clone(),
            Arc::new(InvertedIndex::new()),
            Arc::new(Analyzer::default()),
        );
        (dir, store, indexer)
    }

    fn store_page(store: &Store, url: &str, title: &str, body: &str) -> PageRecord {
        let id = store
            .insert_page(&NewPage {
                url: url.to_string(),
                title: title.to_string(),
                body: body.to_string(),
                depth: 0,
            })
            .unwrap();
        store.get_page(id).unwrap().unwrap()
    }

    #[test]
    fn test_index_page_populates_both_sides() {
        let (_dir, store, indexer) = setup();
        let page = store_page(
            &store,
            "https://example.com/rust",
            "Rust Guide",
            "Rust programs are fast",
        );

        let count = indexer.index_page(&page).unwrap();
        // "are" is a stop word; "rust" x2, "guide", "program", "fast".
        assert_eq!(count, 5);

        let postings = indexer.index().postings("rust");
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].frequency, 2);
        // Title token first, then the body occurrence.
        assert_eq!(postings[0].positions, vec![0, 2]);

        assert_eq!(store.pages_for_term("rust").unwrap(), vec![page.id]);
        assert_eq!(store.get_page(page.id).unwrap().unwrap().word_count, 5);
    }

    #[test]
    fn test_title_positions_precede_body() {
        let (_dir, store, indexer) = setup();
        let page = store_page(&store, "https://example.com/t", "alpha", "beta gamma");
        indexer.index_page(&page).unwrap();

        assert_eq!(indexer.index().postings("alpha")[0].positions, vec![0]);
        assert_eq!(indexer.index().postings("beta")[0].positions, vec![1]);
        assert_eq!(indexer.index().postings("gamma")[0].positions, vec![2]);
    }

    #[test]
    fn test_word_count_sums_term_frequencies() {
        let (_dir, store, indexer) = setup();
        let page = store_page(
            &store,
            "https://example.com/w",
            "counting words",
            "counting the words again and again",
        );
        indexer.index_page(&page).unwrap();

        let stored = store.get_page(page.id).unwrap().unwrap();
        let total_freq: u32 = store
            .load_postings()
            .unwrap()
            .iter()
            .map(|row| row.frequency)
            .sum();
        assert_eq!(stored.word_count, total_freq);
    }

    #[test]
    fn test_reindex_is_idempotent() {
        let (_dir, store, indexer) = setup();
        let page = store_page(
            &store,
            "https://example.com/idem",
            "Stable Title",
            "stable body content",
        );
        indexer.index_page(&page).unwrap();

        indexer.reindex_page(page.id).unwrap();
        let after_once = store.load_postings().unwrap();
        let words_once = store.count_words().unwrap();

        indexer.reindex_page(page.id).unwrap();
        let after_twice = store.load_postings().unwrap();

        assert_eq!(after_once.len(), after_twice.len());
        assert_eq!(words_once, store.count_words().unwrap());
        for (a, b) in after_once.iter().zip(after_twice.iter()) {
            assert_eq!(a.term, b.term);
            assert_eq!(a.page_id, b.page_id);
            assert_eq!(a.frequency, b.frequency);
            assert_eq!(a.positions, b.positions);
        }

        // The memory side holds exactly one posting per term for the page.
        for posting in indexer.index().postings("stabl") {
            assert_eq!(posting.frequency as usize, posting.positions.len());
        }
    }

    #[test]
    fn test_reindex_missing_page() {
        let (_dir, _store, indexer) = setup();
        assert_eq!(indexer.reindex_page(999).unwrap(), 0);
    }

    #[test]
    fn test_index_all_pages() {
        let (_dir, store, indexer) = setup();
        store_page(&store, "https://example.com/1", "one", "first page");
        store_page(&store, "https://example.com/2", "two", "second page");
        store_page(&store, "https://example.com/3", "three", "third page");

        assert_eq!(indexer.index_all_pages().unwrap(), 3);
        assert_eq!(indexer.index().document_frequency("page"), 3);
    }

    #[test]
    fn test_rebuild_matches_original() {
        let (_dir, store, indexer) = setup();
        let page = store_page(
            &store,
            "https://example.com/r",
            "Rebuild Test",
            "rebuild the index from storage",
        );
        indexer.index_page(&page).unwrap();

        let before = indexer.index().postings("rebuild");
        let terms_before = indexer.index().unique_terms();
        let occ_before = indexer.index().total_occurrences();

        indexer.rebuild_index().unwrap();

        assert_eq!(indexer.index().postings("rebuild"), before);
        assert_eq!(indexer.index().unique_terms(), terms_before);
        assert_eq!(indexer.index().total_occurrences(), occ_before);
    }
}
