//! Crawl progress events
//!
//! The engine broadcasts typed events over a channel. Delivery is
//! best-effort: with no subscriber, events are dropped on the floor.

/// Progress events emitted by the crawl engine
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// A crawl session opened
    Started { session_id: i64, seed: String },
    /// A worker picked up a URL
    PageStart { url: String, depth: u32 },
    /// A page was fetched, parsed, and persisted
    PageSuccess {
        url: String,
        depth: u32,
        page_id: i64,
        crawled: u64,
    },
    /// Fetching or parsing a page failed; the session continues
    PageError {
        url: String,
        depth: u32,
        error: String,
    },
    /// A URL was skipped without fetching
    PageSkipped { url: String, reason: String },
    /// The frontier drained naturally
    Completed { pages_crawled: u64 },
    /// The session hit its page cap or was stopped explicitly
    Stopped { pages_crawled: u64 },
}
