//! Database schema definitions
//!
//! All SQL schema for the search engine database. Bootstrap is idempotent;
//! every statement is `IF NOT EXISTS`.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Crawled pages
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    crawled_at TEXT NOT NULL,
    word_count INTEGER NOT NULL DEFAULT 0,
    depth INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_pages_url ON pages(url);

-- Dictionary of stemmed terms
CREATE TABLE IF NOT EXISTS words (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    term TEXT NOT NULL UNIQUE
);

CREATE INDEX IF NOT EXISTS idx_words_term ON words(term);

-- Positional postings: one row per (term, page)
CREATE TABLE IF NOT EXISTS postings (
    word_id INTEGER NOT NULL REFERENCES words(id),
    page_id INTEGER NOT NULL REFERENCES pages(id) ON DELETE CASCADE,
    frequency INTEGER NOT NULL,
    positions_csv TEXT NOT NULL,
    PRIMARY KEY (word_id, page_id)
);

CREATE INDEX IF NOT EXISTS idx_postings_word ON postings(word_id);
CREATE INDEX IF NOT EXISTS idx_postings_page ON postings(page_id);

-- One row per crawl engine invocation
CREATE TABLE IF NOT EXISTS crawl_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    seed TEXT NOT NULL,
    max_depth INTEGER NOT NULL,
    pages_crawled INTEGER NOT NULL DEFAULT 0,
    started_at TEXT NOT NULL,
    ended_at TEXT,
    status TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
