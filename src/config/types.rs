use serde::Deserialize;

/// Main configuration structure for Scour
///
/// Every section and key is optional in the TOML file; anything absent
/// falls back to the compiled-in default.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub indexer: IndexerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent crawl workers
    #[serde(rename = "thread-pool-size", default = "default_thread_pool_size")]
    pub thread_pool_size: usize,

    /// Maximum number of pages to persist per crawl session
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u64,

    /// Default maximum link depth from the seed
    #[serde(rename = "default-depth", default = "default_depth")]
    pub default_depth: u32,

    /// Per-request HTTP timeout (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Politeness delay between requests by one worker (milliseconds)
    #[serde(
        rename = "delay-between-requests-ms",
        default = "default_delay_between_requests_ms"
    )]
    pub delay_between_requests_ms: u64,

    /// User agent sent with every request and matched against robots.txt groups
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whether robots.txt directives are honored
    #[serde(rename = "respect-robots-txt", default = "default_respect_robots")]
    pub respect_robots_txt: bool,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Number of pooled connection handles
    #[serde(rename = "connection-pool-size", default = "default_pool_size")]
    pub connection_pool_size: usize,
}

/// Text analysis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    /// Minimum token length kept by the tokenizer
    #[serde(rename = "min-word-length", default = "default_min_word_length")]
    pub min_word_length: usize,

    /// Maximum token length kept by the tokenizer
    #[serde(rename = "max-word-length", default = "default_max_word_length")]
    pub max_word_length: usize,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Default number of results returned by a search
    #[serde(rename = "max-results", default = "default_max_results")]
    pub max_results: usize,

    /// Target length of generated snippets (characters)
    #[serde(rename = "snippet-length", default = "default_snippet_length")]
    pub snippet_length: usize,
}

fn default_thread_pool_size() -> usize {
    4
}

fn default_max_pages() -> u64 {
    100
}

fn default_depth() -> u32 {
    2
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_delay_between_requests_ms() -> u64 {
    500
}

fn default_user_agent() -> String {
    "ScourBot/1.0".to_string()
}

fn default_respect_robots() -> bool {
    true
}

fn default_database_path() -> String {
    "./scour.db".to_string()
}

fn default_pool_size() -> usize {
    4
}

fn default_min_word_length() -> usize {
    2
}

fn default_max_word_length() -> usize {
    50
}

fn default_max_results() -> usize {
    10
}

fn default_snippet_length() -> usize {
    160
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            thread_pool_size: default_thread_pool_size(),
            max_pages: default_max_pages(),
            default_depth: default_depth(),
            request_timeout_ms: default_request_timeout_ms(),
            delay_between_requests_ms: default_delay_between_requests_ms(),
            user_agent: default_user_agent(),
            respect_robots_txt: default_respect_robots(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            connection_pool_size: default_pool_size(),
        }
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            min_word_length: default_min_word_length(),
            max_word_length: default_max_word_length(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            snippet_length: default_snippet_length(),
        }
    }
}
