//! Configuration module for Scour
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key is optional; missing keys fall back to compiled-in
//! defaults so the engine can run without any configuration file at all.
//!
//! # Example
//!
//! ```no_run
//! use scour::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scour.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.thread_pool_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, DatabaseConfig, IndexerConfig, SearchConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
