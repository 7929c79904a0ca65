//! Path management for the bookstore catalog
//!
//! Every component receives its locations from a `BookstorePaths` value
//! instead of process-wide constants, so tests can point everything at a
//! temporary directory.
//!
//! ## Path Resolution Order
//!
//! 1. `BOOKSTORE_CLI_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories::ProjectDirs`
//!    (e.g. `~/.config/bookstore-cli` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BookstoreError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BOOKSTORE_CLI_DATA_DIR";

/// Database filename inside the data directory
pub const DATABASE_FILENAME: &str = "livraria.db";

/// Default CSV export filename inside the export directory
pub const EXPORT_FILENAME: &str = "livros_exportados.csv";

/// Manages all paths used by the catalog
#[derive(Debug, Clone)]
pub struct BookstorePaths {
    /// Base directory for all catalog data
    base_dir: PathBuf,
}

impl BookstorePaths {
    /// Create a new BookstorePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no platform config directory can be determined
    /// and the override variable is not set.
    pub fn new() -> Result<Self, BookstoreError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create BookstorePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding the database file
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the backup directory holding database snapshots
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the export directory for CSV exports
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the path to the SQLite database file
    pub fn database_file(&self) -> PathBuf {
        self.data_dir().join(DATABASE_FILENAME)
    }

    /// Get the default CSV export destination
    pub fn default_export_file(&self) -> PathBuf {
        self.export_dir().join(EXPORT_FILENAME)
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure all required directories exist
    ///
    /// Creates the base, data, backup and export directories.
    pub fn ensure_directories(&self) -> Result<(), BookstoreError> {
        for (label, dir) in [
            ("base", self.base_dir.clone()),
            ("data", self.data_dir()),
            ("backup", self.backup_dir()),
            ("export", self.export_dir()),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                BookstoreError::Storage(format!(
                    "Failed to create {} directory {}: {}",
                    label,
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }
}

/// Resolve the default base directory from the platform conventions
fn resolve_default_path() -> Result<PathBuf, BookstoreError> {
    ProjectDirs::from("", "", "bookstore-cli")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            BookstoreError::Config(format!(
                "Could not determine a config directory; set {}",
                DATA_DIR_ENV
            ))
        })
}
