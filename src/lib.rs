//! Scour: a desktop web search engine
//!
//! This crate crawls a subset of the public web starting from a seed URL,
//! stores page content in a local SQLite database, builds a positional
//! inverted index over it, and answers keyword queries ranked by TF-IDF
//! with highlighted snippets.

pub mod analyzer;
pub mod config;
pub mod crawler;
pub mod frontier;
pub mod index;
pub mod indexer;
pub mod robots;
pub mod search;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Scour operations
#[derive(Debug, Error)]
pub enum ScourError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Non-HTML content for {url}: {content_type}")]
    ContentType { url: String, content_type: String },

    #[error("Storage error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Crawl engine is already running")]
    AlreadyRunning,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Empty URL")]
    Empty,
}

/// Result type alias for Scour operations
pub type Result<T> = std::result::Result<T, ScourError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analyzer::Analyzer;
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlEvent};
pub use frontier::Frontier;
pub use index::InvertedIndex;
pub use indexer::Indexer;
pub use search::{SearchEngine, SearchResult};
pub use storage::Store;
pub use crate::url::{admissible, canonicalize, resolve, same_origin};
