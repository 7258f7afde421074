//! Bounded SQLite connection pool
//!
//! The store shares one database file between the crawl workers, the
//! indexer, and the search side. Each operation leases one handle for its
//! duration; acquisition blocks when every handle is out.

use crate::storage::schema::initialize_schema;
use rusqlite::Connection;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::{Condvar, Mutex};

/// A fixed-size pool of SQLite connections to one database file
pub struct ConnectionPool {
    connections: Mutex<Vec<Connection>>,
    available: Condvar,
}

impl ConnectionPool {
    /// Opens a pool of `size` connections and bootstraps the schema
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `size` - Number of pooled handles (must be >= 1)
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionPool)` - Pool ready for use
    /// * `Err(rusqlite::Error)` - Failed to open or configure a connection
    pub fn open(path: &Path, size: usize) -> Result<Self, rusqlite::Error> {
        let size = size.max(1);
        let mut connections = Vec::with_capacity(size);

        for i in 0..size {
            let conn = Connection::open(path)?;
            conn.execute_batch(
                "
                PRAGMA journal_mode = WAL;
                PRAGMA synchronous = NORMAL;
                PRAGMA foreign_keys = ON;
                PRAGMA busy_timeout = 5000;
                PRAGMA temp_store = MEMORY;
            ",
            )?;

            if i == 0 {
                initialize_schema(&conn)?;
            }

            connections.push(conn);
        }

        Ok(Self {
            connections: Mutex::new(connections),
            available: Condvar::new(),
        })
    }

    /// Leases a connection, blocking until one is free
    ///
    /// The handle returns to the pool when the guard drops. Never hold a
    /// guard across I/O to another subsystem.
    pub fn acquire(&self) -> PooledConnection<'_> {
        let mut connections = self.connections.lock().unwrap();
        loop {
            if let Some(conn) = connections.pop() {
                return PooledConnection {
                    conn: Some(conn),
                    pool: self,
                };
            }
            connections = self.available.wait(connections).unwrap();
        }
    }

    /// Number of handles currently free
    pub fn idle_count(&self) -> usize {
        self.connections.lock().unwrap().len()
    }

    fn release(&self, conn: Connection) {
        self.connections.lock().unwrap().push(conn);
        self.available.notify_one();
    }
}

/// A leased connection handle; derefs to [`rusqlite::Connection`]
pub struct PooledConnection<'a> {
    conn: Option<Connection>,
    pool: &'a ConnectionPool,
}

impl Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().expect("connection present until drop")
    }
}

impl DerefMut for PooledConnection<'_> {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().expect("connection present until drop")
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.release(conn);
        }
    }
}
