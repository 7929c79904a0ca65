//! Audit logging for the bookstore catalog
//!
//! Records every create, update, delete, import and restore in an
//! append-only JSONL journal next to the database. Each entry names the
//! snapshot that was taken before the change, so the journal tells which
//! backup to restore to undo a given operation.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookstore::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::delete("Dune", &removed).with_snapshot(snapshot.as_deref()))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
