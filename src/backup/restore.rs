//! Backup restoration for the bookstore catalog
//!
//! Validates snapshots and copies them back over the live database.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::config::paths::BookstorePaths;
use crate::error::{BookstoreError, BookstoreResult};
use crate::storage::database::{table_exists, Database, BOOKS_TABLE};

use super::manager::{BACKUP_EXTENSION, BACKUP_PREFIX, TIMESTAMP_FORMAT};

/// Handles restoring from snapshots
pub struct RestoreManager {
    paths: BookstorePaths,
}

impl RestoreManager {
    /// Create a new RestoreManager
    pub fn new(paths: BookstorePaths) -> Self {
        Self { paths }
    }

    /// Check that a snapshot is a readable catalog database
    pub fn validate_backup(&self, backup_path: &Path) -> BookstoreResult<ValidationResult> {
        if !backup_path.is_file() {
            return Err(BookstoreError::backup_not_found(
                backup_path.display().to_string(),
            ));
        }

        let conn = Database::connect_read_only(backup_path)
            .map_err(|e| BookstoreError::Backup(format!("Cannot open snapshot: {}", e)))?;

        let has_books_table = table_exists(&conn, BOOKS_TABLE)
            .map_err(|e| BookstoreError::Backup(format!("Snapshot is not a database: {}", e)))?;

        let book_count = if has_books_table {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM livros", [], |row| row.get(0))
                .map_err(|e| BookstoreError::Backup(format!("Cannot read snapshot: {}", e)))?;
            count as usize
        } else {
            0
        };

        Ok(ValidationResult {
            backup_date: backup_date_from_path(backup_path),
            has_books_table,
            book_count,
        })
    }

    /// Replace the live database with the contents of a snapshot
    ///
    /// This overwrites every current record. Callers should snapshot the
    /// live database first.
    pub fn restore_from_file(&self, backup_path: &Path) -> BookstoreResult<RestoreResult> {
        let validation = self.validate_backup(backup_path)?;
        if !validation.is_valid() {
            return Err(BookstoreError::Backup(format!(
                "{} does not contain a book table",
                backup_path.display()
            )));
        }

        self.paths.ensure_directories()?;
        let target = self.paths.database_file();
        fs::copy(backup_path, &target).map_err(|e| {
            BookstoreError::Backup(format!("Failed to restore database: {}", e))
        })?;

        tracing::info!(from = %backup_path.display(), "database restored");

        Ok(RestoreResult {
            restored_from: backup_path.to_path_buf(),
            book_count: validation.book_count,
        })
    }
}

/// Parse the creation timestamp from a snapshot path, if it follows the naming scheme
fn backup_date_from_path(path: &Path) -> Option<NaiveDateTime> {
    let name = path.file_name()?.to_str()?;
    let body = name.strip_prefix(BACKUP_PREFIX)?.strip_suffix(BACKUP_EXTENSION)?;
    let stamp = body.get(..19)?;
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
}

/// Result of validating a snapshot
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Timestamp from the snapshot name, if it follows the naming scheme
    pub backup_date: Option<NaiveDateTime>,
    pub has_books_table: bool,
    pub book_count: usize,
}

impl ValidationResult {
    /// Whether the snapshot can be restored
    pub fn is_valid(&self) -> bool {
        self.has_books_table
    }

    /// One-line description for display
    pub fn summary(&self) -> String {
        if self.has_books_table {
            format!("Valid ({} books)", self.book_count)
        } else {
            "Invalid (no book table)".to_string()
        }
    }
}

/// Result of a restore operation
#[derive(Debug, Clone)]
pub struct RestoreResult {
    pub restored_from: PathBuf,
    pub book_count: usize,
}

impl RestoreResult {
    /// One-line description for display
    pub fn summary(&self) -> String {
        format!(
            "Restored {} books from {}",
            self.book_count,
            self.restored_from.display()
        )
    }
}
