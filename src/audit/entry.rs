//! Audit entry data structures
//!
//! Defines the structure of audit log entries: the operation, the title or
//! author filter it used, how many rows it touched, and the snapshot taken
//! before it ran.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// A book was added
    Create,
    /// Prices were changed
    Update,
    /// Books were removed
    Delete,
    /// Books were bulk-loaded from CSV
    Import,
    /// The database was replaced by a snapshot
    Restore,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Import => write!(f, "IMPORT"),
            Operation::Restore => write!(f, "RESTORE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// Substring filter, source file, or book id the operation targeted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Number of rows affected
    pub affected: usize,

    /// Snapshot filename taken before the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,

    /// Records before the operation (for updates/deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Records after the operation (for creates/updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Create a new entry with no payload
    pub fn new(operation: Operation, target: Option<String>, affected: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            target,
            affected,
            snapshot: None,
            before: None,
            after: None,
        }
    }

    /// Entry for a created record
    pub fn create<T: Serialize>(target: impl Into<String>, record: &T) -> Self {
        Self::new(Operation::Create, Some(target.into()), 1).with_after(record)
    }

    /// Entry for records whose price was updated
    pub fn update<T: Serialize>(filter: impl Into<String>, before: &[T], after: &[T]) -> Self {
        Self::new(Operation::Update, Some(filter.into()), before.len())
            .with_before(&before)
            .with_after(&after)
    }

    /// Entry for removed records
    pub fn delete<T: Serialize>(filter: impl Into<String>, removed: &[T]) -> Self {
        Self::new(Operation::Delete, Some(filter.into()), removed.len()).with_before(&removed)
    }

    /// Record the snapshot that guarded this operation
    pub fn with_snapshot(mut self, snapshot: Option<&Path>) -> Self {
        self.snapshot = snapshot
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().to_string());
        self
    }

    fn with_before<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.before = serde_json::to_value(value).ok();
        self
    }

    fn with_after<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.after = serde_json::to_value(value).ok();
        self
    }

    /// Format the entry as a human-readable one-liner
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "{} {} {} row(s)",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.affected
        );

        if let Some(target) = &self.target {
            output.push_str(&format!(" [{}]", target));
        }

        if let Some(snapshot) = &self.snapshot {
            output.push_str(&format!(" (snapshot: {})", snapshot));
        }

        output
    }
}
