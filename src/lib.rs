//! BookstoreCLI - a small bookstore catalog on SQLite
//!
//! This library keeps a catalog of books in a single SQLite file and
//! protects it with timestamped snapshots: every change to the catalog is
//! preceded by a copy of the database file, and only the newest few copies
//! are kept.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: The book record and its identifier
//! - `storage`: SQLite schema and book repository
//! - `backup`: Snapshot creation, retention and restore
//! - `audit`: Append-only journal of catalog changes
//! - `services`: Snapshot-guarded catalog operations and CSV import
//! - `export`: CSV export
//! - `display`: Table formatting for the terminal
//! - `cli`: Command handlers and the interactive menu
//! - `logging`: Diagnostic tracing setup
//!
//! # Example
//!
//! ```rust,ignore
//! use bookstore::config::{paths::BookstorePaths, settings::Settings};
//! use bookstore::services::CatalogService;
//! use bookstore::storage::Storage;
//!
//! let paths = BookstorePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! let catalog = CatalogService::new(&storage, &settings);
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::BookstoreError;
