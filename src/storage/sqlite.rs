//! SQLite-backed store
//!
//! [`Store`] is a cheap-to-clone handle sharing one connection pool. Every
//! method leases a connection, runs its statements, and releases the
//! handle before returning.

use crate::storage::pool::ConnectionPool;
use crate::storage::{
    positions_from_csv, positions_to_csv, NewPage, PageRecord, PostingRow, SessionRecord,
    SessionStatus, StoreError, StoreResult,
};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Durable store for pages, words, postings, and crawl sessions
#[derive(Clone)]
pub struct Store {
    pool: Arc<ConnectionPool>,
}

impl Store {
    /// Opens (or creates) the database at `path` with a bounded handle pool
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `pool_size` - Number of pooled connection handles
    pub fn open(path: &Path, pool_size: usize) -> StoreResult<Self> {
        let pool = ConnectionPool::open(path, pool_size)?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    // ===== Pages =====

    /// Inserts a new page and returns its id
    ///
    /// The crawl timestamp is assigned here; the word count starts at zero
    /// and is set by the indexer.
    ///
    /// # Errors
    ///
    /// * `StoreError::UrlExists` - A page with this URL is already stored
    pub fn insert_page(&self, page: &NewPage) -> StoreResult<i64> {
        let conn = self.pool.acquire();
        let now = Utc::now().to_rfc3339();

        let result = conn.execute(
            "INSERT INTO pages (url, title, body, crawled_at, word_count, depth)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![page.url, page.title, page.body, now, page.depth],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::UrlExists(page.url.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// Gets a page by id
    pub fn get_page(&self, page_id: i64) -> StoreResult<Option<PageRecord>> {
        let conn = self.pool.acquire();
        let page = conn
            .query_row(
                "SELECT id, url, title, body, crawled_at, word_count, depth
                 FROM pages WHERE id = ?1",
                params![page_id],
                row_to_page,
            )
            .optional()?;
        Ok(page)
    }

    /// Gets a page by canonical URL
    pub fn get_page_by_url(&self, url: &str) -> StoreResult<Option<PageRecord>> {
        let conn = self.pool.acquire();
        let page = conn
            .query_row(
                "SELECT id, url, title, body, crawled_at, word_count, depth
                 FROM pages WHERE url = ?1",
                params![url],
                row_to_page,
            )
            .optional()?;
        Ok(page)
    }

    /// Lists all stored pages ordered by id
    pub fn list_pages(&self) -> StoreResult<Vec<PageRecord>> {
        let conn = self.pool.acquire();
        let mut stmt = conn.prepare(
            "SELECT id, url, title, body, crawled_at, word_count, depth
             FROM pages ORDER BY id",
        )?;
        let pages = stmt
            .query_map([], row_to_page)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pages)
    }

    /// Counts stored pages
    pub fn count_pages(&self) -> StoreResult<u64> {
        let conn = self.pool.acquire();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Sets the indexed token count for a page
    pub fn update_page_word_count(&self, page_id: i64, word_count: u32) -> StoreResult<()> {
        let conn = self.pool.acquire();
        conn.execute(
            "UPDATE pages SET word_count = ?1 WHERE id = ?2",
            params![word_count, page_id],
        )?;
        Ok(())
    }

    /// Deletes a page; its postings go with it via cascade
    pub fn delete_page(&self, page_id: i64) -> StoreResult<()> {
        let conn = self.pool.acquire();
        conn.execute("DELETE FROM pages WHERE id = ?1", params![page_id])?;
        Ok(())
    }

    // ===== Words and postings =====

    /// Inserts a term if absent and returns its id either way
    pub fn upsert_word(&self, term: &str) -> StoreResult<i64> {
        let conn = self.pool.acquire();
        upsert_word_on(&conn, term)
    }

    /// Writes the posting for one (word, page) pair, replacing any existing row
    pub fn upsert_posting(
        &self,
        word_id: i64,
        page_id: i64,
        frequency: u32,
        positions: &[u32],
    ) -> StoreResult<()> {
        let conn = self.pool.acquire();
        conn.execute(
            "INSERT OR REPLACE INTO postings (word_id, page_id, frequency, positions_csv)
             VALUES (?1, ?2, ?3, ?4)",
            params![word_id, page_id, frequency, positions_to_csv(positions)],
        )?;
        Ok(())
    }

    /// Writes every posting for one page in a single transaction
    ///
    /// Each entry maps a stemmed term to its ascending position list; the
    /// word row is created on first sight of the term.
    pub fn write_page_postings(
        &self,
        page_id: i64,
        groups: &BTreeMap<String, Vec<u32>>,
    ) -> StoreResult<()> {
        let mut conn = self.pool.acquire();
        let tx = conn.transaction()?;

        for (term, positions) in groups {
            let word_id = upsert_word_on(&tx, term)?;
            tx.execute(
                "INSERT OR REPLACE INTO postings (word_id, page_id, frequency, positions_csv)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    word_id,
                    page_id,
                    positions.len() as u32,
                    positions_to_csv(positions)
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Removes all postings for a page (used before re-indexing it)
    pub fn delete_postings_for_page(&self, page_id: i64) -> StoreResult<()> {
        let conn = self.pool.acquire();
        conn.execute("DELETE FROM postings WHERE page_id = ?1", params![page_id])?;
        Ok(())
    }

    /// Lists the ids of pages containing a term
    pub fn pages_for_term(&self, term: &str) -> StoreResult<Vec<i64>> {
        let conn = self.pool.acquire();
        let mut stmt = conn.prepare(
            "SELECT p.page_id FROM postings p
             JOIN words w ON w.id = p.word_id
             WHERE w.term = ?1
             ORDER BY p.page_id",
        )?;
        let ids = stmt
            .query_map(params![term], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Loads every stored posting for index reconstruction
    ///
    /// Rows whose position list fails to parse are logged and skipped so
    /// one corrupt posting cannot poison the whole index.
    pub fn load_postings(&self) -> StoreResult<Vec<PostingRow>> {
        let conn = self.pool.acquire();
        let mut stmt = conn.prepare(
            "SELECT w.term, p.page_id, p.frequency, p.positions_csv
             FROM postings p
             JOIN words w ON w.id = p.word_id
             ORDER BY w.term, p.page_id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut postings = Vec::new();
        for row in rows {
            let (term, page_id, frequency, csv) = row?;
            match positions_from_csv(&csv) {
                Some(positions) => postings.push(PostingRow {
                    term,
                    page_id,
                    frequency,
                    positions,
                }),
                None => {
                    tracing::warn!(
                        "Skipping corrupt posting for term '{}' page {}: {:?}",
                        term,
                        page_id,
                        csv
                    );
                }
            }
        }

        Ok(postings)
    }

    /// Counts dictionary terms
    pub fn count_words(&self) -> StoreResult<u64> {
        let conn = self.pool.acquire();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Counts stored postings
    pub fn count_postings(&self) -> StoreResult<u64> {
        let conn = self.pool.acquire();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM postings", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Crawl sessions =====

    /// Opens a new running crawl session and returns its id
    pub fn create_session(&self, seed: &str, max_depth: u32) -> StoreResult<i64> {
        let conn = self.pool.acquire();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO crawl_sessions (seed, max_depth, pages_crawled, started_at, status)
             VALUES (?1, ?2, 0, ?3, ?4)",
            params![seed, max_depth, now, SessionStatus::Running.to_db_string()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Updates a session's page count and status
    ///
    /// Moving to any terminal status stamps `ended_at`.
    pub fn update_session(
        &self,
        session_id: i64,
        pages_crawled: u64,
        status: SessionStatus,
    ) -> StoreResult<()> {
        let conn = self.pool.acquire();
        let ended_at = if status.is_terminal() {
            Some(Utc::now().to_rfc3339())
        } else {
            None
        };
        conn.execute(
            "UPDATE crawl_sessions SET pages_crawled = ?1, status = ?2, ended_at = ?3
             WHERE id = ?4",
            params![
                pages_crawled as i64,
                status.to_db_string(),
                ended_at,
                session_id
            ],
        )?;
        Ok(())
    }

    /// Gets a session by id
    pub fn get_session(&self, session_id: i64) -> StoreResult<Option<SessionRecord>> {
        let conn = self.pool.acquire();
        let session = conn
            .query_row(
                "SELECT id, seed, max_depth, pages_crawled, started_at, ended_at, status
                 FROM crawl_sessions WHERE id = ?1",
                params![session_id],
                row_to_session,
            )
            .optional()?;
        Ok(session)
    }

    /// Lists all sessions, most recent first
    pub fn list_sessions(&self) -> StoreResult<Vec<SessionRecord>> {
        let conn = self.pool.acquire();
        let mut stmt = conn.prepare(
            "SELECT id, seed, max_depth, pages_crawled, started_at, ended_at, status
             FROM crawl_sessions ORDER BY id DESC",
        )?;
        let sessions = stmt
            .query_map([], row_to_session)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    // ===== Maintenance =====

    /// Deletes everything: postings, words, pages, and sessions
    pub fn clear_all(&self) -> StoreResult<()> {
        let mut conn = self.pool.acquire();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM postings", [])?;
        tx.execute("DELETE FROM words", [])?;
        tx.execute("DELETE FROM pages", [])?;
        tx.execute("DELETE FROM crawl_sessions", [])?;
        tx.commit()?;
        Ok(())
    }
}

fn upsert_word_on(conn: &rusqlite::Connection, term: &str) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO words (term) VALUES (?1) ON CONFLICT(term) DO NOTHING",
        params![term],
    )?;
    let id: i64 = conn.query_row(
        "SELECT id FROM words WHERE term = ?1",
        params![term],
        |row| row.get(0),
    )?;
    Ok(id)
}

fn row_to_page(row: &rusqlite::Row<'_>) -> rusqlite::Result<PageRecord> {
    Ok(PageRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        crawled_at: row.get(4)?,
        word_count: row.get(5)?,
        depth: row.get(6)?,
    })
}

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRecord> {
    Ok(SessionRecord {
        id: row.get(0)?,
        seed: row.get(1)?,
        max_depth: row.get(2)?,
        pages_crawled: row.get::<_, i64>(3)? as u64,
        started_at: row.get(4)?,
        ended_at: row.get(5)?,
        status: SessionStatus::from_db_string(&row.get::<_, String>(6)?)
            .unwrap_or(SessionStatus::Error),
    })
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(f, _) if f.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
