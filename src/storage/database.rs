//! SQLite database handle
//!
//! Holds the location of the database file and hands out one fresh
//! connection per operation. Nothing keeps a connection open between calls.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::error::{BookstoreError, BookstoreResult};

/// Table holding the book records
pub const BOOKS_TABLE: &str = "livros";

/// Location of the catalog database file
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Create a handle for the database file at `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path to the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the database file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Open a read-write connection, creating the file if it is missing
    pub fn connect(&self) -> BookstoreResult<Connection> {
        Connection::open(&self.path).map_err(|e| {
            BookstoreError::Storage(format!(
                "Failed to open database {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Open a read-only connection to an existing database file
    pub fn connect_read_only(path: &Path) -> BookstoreResult<Connection> {
        Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(|e| {
            BookstoreError::Storage(format!(
                "Failed to open database {}: {}",
                path.display(),
                e
            ))
        })
    }
}

/// Check whether a table exists in the connected database
pub fn table_exists(conn: &Connection, table: &str) -> BookstoreResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
