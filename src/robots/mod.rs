//! Robots.txt handling
//!
//! Fetching, parsing, and per-origin caching of crawl directives. The
//! crawler asks one question: may this URL be fetched under the configured
//! user agent?

mod cache;
mod parser;

pub use cache::RobotsPolicy;
pub use parser::{product_token, RobotsRules};
