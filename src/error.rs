//! Custom error types for the bookstore catalog
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for catalog operations
#[derive(Error, Debug)]
pub enum BookstoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The database file or its directory cannot be created or opened
    #[error("Storage error: {0}")]
    Storage(String),

    /// A statement against the book table failed
    #[error("Repository error: {0}")]
    Repository(String),

    /// A CSV row failed type coercion or required columns are missing
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Snapshot copy, retention deletion, or restore failed
    #[error("Backup error: {0}")]
    Backup(String),
}

impl BookstoreError {
    /// Create a "not found" error for backup snapshots
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from the backup subsystem
    pub fn is_backup(&self) -> bool {
        matches!(self, Self::Backup(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BookstoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BookstoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for BookstoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Repository(err.to_string())
    }
}

/// Result type alias for catalog operations
pub type BookstoreResult<T> = Result<T, BookstoreError>;
