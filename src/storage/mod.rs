//! Storage layer for the bookstore catalog
//!
//! Provides the SQLite database handle, schema initialization and the
//! book repository.

pub mod books;
pub mod database;
pub mod init;

pub use books::BookRepository;
pub use database::Database;
pub use init::{ensure_storage, needs_initialization};

use rusqlite::Connection;

use crate::config::paths::BookstorePaths;
use crate::error::BookstoreResult;

/// Main storage coordinator that provides access to the database and repository
pub struct Storage {
    paths: BookstorePaths,
    database: Database,
    pub books: BookRepository,
}

impl Storage {
    /// Create a new Storage instance, initializing the database if needed
    pub fn new(paths: BookstorePaths) -> BookstoreResult<Self> {
        ensure_storage(&paths)?;

        Ok(Self {
            database: Database::new(paths.database_file()),
            books: BookRepository::new(),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &BookstorePaths {
        &self.paths
    }

    /// Get the database handle
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Open a dedicated connection for one operation
    pub fn connect(&self) -> BookstoreResult<Connection> {
        self.database.connect()
    }
}
