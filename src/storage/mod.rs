//! Storage module for the durable side of the search engine
//!
//! This module owns every persistent entity: crawled pages, the word
//! dictionary, positional postings, and crawl sessions. Access goes
//! through [`Store`], a cloneable handle over a bounded pool of SQLite
//! connections.

mod pool;
mod schema;
mod sqlite;

pub use pool::{ConnectionPool, PooledConnection};
pub use schema::initialize_schema;
pub use sqlite::Store;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL already stored: {0}")]
    UrlExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A page to be inserted; id, timestamp, and word count are assigned by the store
#[derive(Debug, Clone)]
pub struct NewPage {
    pub url: String,
    pub title: String,
    pub body: String,
    pub depth: u32,
}

/// A stored page
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub body: String,
    pub crawled_at: String,
    pub word_count: u32,
    pub depth: u32,
}

/// A posting row as stored: one term in one page
#[derive(Debug, Clone)]
pub struct PostingRow {
    pub term: String,
    pub page_id: i64,
    pub frequency: u32,
    pub positions: Vec<u32>,
}

/// A stored crawl session
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: i64,
    pub seed: String,
    pub max_depth: u32,
    pub pages_crawled: u64,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub status: SessionStatus,
}

/// Status of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Completed,
    Stopped,
    Error,
}

impl SessionStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
            Self::Error => "error",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "stopped" => Some(Self::Stopped),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// True once the session can no longer change
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Serializes token positions as an ascending comma-separated list
pub fn positions_to_csv(positions: &[u32]) -> String {
    positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses a positions CSV, rejecting malformed or out-of-order data
///
/// Returns `None` for anything that is not a non-empty ascending list of
/// non-negative integers; callers treat such postings as absent.
pub fn positions_from_csv(csv: &str) -> Option<Vec<u32>> {
    if csv.is_empty() {
        return None;
    }

    let mut positions = Vec::new();
    for part in csv.split(',') {
        let value: u32 = part.trim().parse().ok()?;
        if let Some(&last) = positions.last() {
            if value < last {
                return None;
            }
        }
        positions.push(value);
    }
    Some(positions)
}
