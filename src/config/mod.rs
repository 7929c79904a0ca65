//! Configuration module for the bookstore catalog
//!
//! This module provides configuration management including:
//! - Path resolution for the database, backups and exports
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BookstorePaths;
pub use settings::Settings;
