//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod backup;
pub mod book;
pub mod menu;
pub mod transfer;

pub use audit::handle_audit_command;
pub use backup::{handle_backup_command, BackupCommands};
pub use book::{handle_book_command, BookCommands};
pub use menu::Menu;
pub use transfer::{handle_export_command, handle_import_command};
