//! Business logic layer for the bookstore catalog
//!
//! Services sit between the CLI and storage. They validate input, take a
//! snapshot before each mutation, and write the audit journal.

pub mod catalog;
pub mod import;

pub use catalog::CatalogService;
pub use import::{ColumnMapping, ImportResult, ImportService};
