//! Storage initialization
//!
//! Creates the directory layout, the database file and the book table.
//! Safe to run on every start.

use crate::config::paths::BookstorePaths;
use crate::error::{BookstoreError, BookstoreResult};

use super::database::Database;

/// Schema of the book table
pub const CREATE_BOOKS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS livros (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        titulo TEXT NOT NULL,
        autor TEXT NOT NULL,
        ano_publicacao INTEGER,
        preco REAL
    )";

/// Ensure the database file and book table exist
///
/// Creates the data, backup and export directories, opens (and thereby
/// creates) the database file, and creates the table if it is missing.
pub fn ensure_storage(paths: &BookstorePaths) -> BookstoreResult<()> {
    paths.ensure_directories()?;

    let database = Database::new(paths.database_file());
    let conn = database.connect()?;
    conn.execute_batch(CREATE_BOOKS_TABLE).map_err(|e| {
        BookstoreError::Storage(format!("Failed to create book table: {}", e))
    })?;

    tracing::debug!(path = %database.path().display(), "storage ready");
    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &BookstorePaths) -> bool {
    !paths.database_file().exists()
}
