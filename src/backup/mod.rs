//! Backup system for the bookstore catalog
//!
//! Every mutating operation snapshots the database file first. Snapshots
//! are plain byte copies of the SQLite file, so any of them can be opened
//! directly with SQLite or restored through `RestoreManager`.
//!
//! # Architecture
//!
//! - `BackupManager`: Creates snapshots and enforces the retention cap
//! - `RestoreManager`: Validates and restores snapshots
//!
//! # Retention Policy
//!
//! By default the five newest snapshots are kept. Older ones are deleted
//! right after each new snapshot is written.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookstore::backup::{BackupManager, RestoreManager};
//! use bookstore::config::{paths::BookstorePaths, settings::BackupRetention};
//!
//! let paths = BookstorePaths::new()?;
//! let manager = BackupManager::new(&paths, BackupRetention::default());
//!
//! if let Some(snapshot) = manager.snapshot()? {
//!     let restore = RestoreManager::new(paths);
//!     println!("{}", restore.restore_from_file(&snapshot)?.summary());
//! }
//! ```

mod manager;
mod restore;

pub use manager::{BackupInfo, BackupManager, BACKUP_EXTENSION, BACKUP_PREFIX};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
