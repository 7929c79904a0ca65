//! Audit journal CLI command

use crate::error::BookstoreResult;
use crate::services::CatalogService;

/// Print the most recent journal entries, oldest first
pub fn handle_audit_command(catalog: &CatalogService, limit: usize) -> BookstoreResult<()> {
    let entries = catalog.audit().read_recent(limit)?;

    if entries.is_empty() {
        println!("The audit log is empty.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    println!();
    println!("Log file: {}", catalog.audit().path().display());

    Ok(())
}
