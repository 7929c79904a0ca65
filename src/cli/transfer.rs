//! CSV export and import CLI commands

use std::path::{Path, PathBuf};

use crate::config::paths::BookstorePaths;
use crate::error::BookstoreResult;
use crate::services::{CatalogService, ImportService};

/// Handle the export command
///
/// Writes to `output`, or to the default export file when none is given.
pub fn handle_export_command(
    catalog: &CatalogService,
    paths: &BookstorePaths,
    output: Option<PathBuf>,
) -> BookstoreResult<()> {
    let destination = output.unwrap_or_else(|| paths.default_export_file());
    let count = catalog.export_csv(&destination)?;
    println!("Exported {} book(s) to: {}", count, destination.display());
    Ok(())
}

/// Handle the import command
pub fn handle_import_command(catalog: &CatalogService, file: &Path) -> BookstoreResult<()> {
    let result = ImportService::new(catalog).import_csv(file)?;
    println!("Imported {} book(s) from: {}", result.imported, file.display());
    if let Some(snapshot) = result.snapshot {
        println!("Pre-import backup: {}", snapshot.display());
    }
    Ok(())
}
