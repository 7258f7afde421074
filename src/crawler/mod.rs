//! Crawler module
//!
//! The concurrent crawl pipeline: a worker pool drains the frontier,
//! checks robots directives, fetches and parses HTML, persists pages,
//! and feeds extracted links back into the frontier. Progress surfaces
//! as broadcast events.

mod engine;
mod events;
mod fetcher;
mod parser;

pub use engine::{CrawlEngine, CrawlOutcome};
pub use events::CrawlEvent;
pub use fetcher::{build_http_client, fetch_html, FetchedPage};
pub use parser::{parse_page, ParsedPage};
