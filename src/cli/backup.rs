//! Backup CLI commands
//!
//! Implements CLI commands for snapshot management.

use clap::Subcommand;
use std::path::PathBuf;

use crate::backup::{BackupManager, RestoreManager};
use crate::config::paths::BookstorePaths;
use crate::error::{BookstoreError, BookstoreResult};
use crate::services::CatalogService;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot the database now
    Create,

    /// List all available snapshots
    List {
        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Restore the database from a snapshot
    Restore {
        /// Snapshot filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show information about a specific snapshot
    Info {
        /// Snapshot filename or path
        backup: String,
    },

    /// Delete snapshots beyond the retention cap
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    catalog: &CatalogService,
    paths: &BookstorePaths,
    cmd: BackupCommands,
) -> BookstoreResult<()> {
    let manager = catalog.backups();

    match cmd {
        BackupCommands::Create => match catalog.backup_now()? {
            Some(path) => {
                println!("Backup created: {}", display_name(&path));
                println!("Location: {}", path.display());
            }
            None => println!("Nothing to back up yet: the database does not exist."),
        },

        BackupCommands::List { detailed } => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: bookstore backup create");
                return Ok(());
            }

            println!("Available Backups (newest first)");
            println!("================================");
            println!();

            let now = chrono::Local::now().naive_local();
            for (i, backup) in backups.iter().enumerate() {
                let age_str = format_duration(now.signed_duration_since(backup.created_at));

                if detailed {
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        backup.filename,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S"),
                        format_size(backup.size_bytes),
                        age_str,
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.filename,
                        age_str,
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!(
                "Total: {} backup(s), keeping at most {}",
                backups.len(),
                manager.max_backups()
            );
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(manager, paths, &backup)?;

            let restore_manager = RestoreManager::new(paths.clone());
            let validation = restore_manager.validate_backup(&backup_path)?;

            println!("Backup Information");
            println!("==================");
            println!("File: {}", backup_path.display());
            if let Some(date) = validation.backup_date {
                println!("Created: {}", date.format("%Y-%m-%d %H:%M:%S"));
            }
            println!("Status: {}", validation.summary());
            println!();

            if !force {
                println!("WARNING: This will overwrite ALL current books!");
                println!("To proceed, run again with --force flag:");
                println!("  bookstore backup restore {} --force", backup);
                return Ok(());
            }

            println!("Creating backup of current data before restore...");
            let (result, pre_restore) = catalog.restore(&backup_path)?;
            if let Some(path) = &pre_restore {
                println!("Pre-restore backup saved: {}", display_name(path));
            }

            println!("Restore complete!");
            println!("{}", result.summary());
        }

        BackupCommands::Info { backup } => {
            let backup_path = resolve_backup_path(manager, paths, &backup)?;

            let restore_manager = RestoreManager::new(paths.clone());
            let validation = restore_manager.validate_backup(&backup_path)?;
            let metadata = std::fs::metadata(&backup_path)?;

            println!("Backup Details");
            println!("==============");
            println!("File: {}", backup_path.display());
            println!("Size: {}", format_size(metadata.len()));
            if let Some(date) = validation.backup_date {
                println!("Created: {}", date.format("%Y-%m-%d %H:%M:%S"));
            }
            println!("Books: {}", validation.book_count);
            println!("Status: {}", validation.summary());
        }

        BackupCommands::Prune { force } => {
            let backups = manager.list_backups()?;
            let to_delete = backups.len().saturating_sub(manager.max_backups());

            if to_delete == 0 {
                println!("No backups to prune.");
                println!(
                    "You have {} backup(s); the retention cap is {}.",
                    backups.len(),
                    manager.max_backups()
                );
                return Ok(());
            }

            println!("Prune Summary");
            println!("=============");
            println!("Retention cap: {}", manager.max_backups());
            println!("Current backups: {}", backups.len());
            println!("To be deleted: {}", to_delete);
            println!();

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  bookstore backup prune --force");
                return Ok(());
            }

            let deleted = manager.enforce_retention(manager.max_backups())?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(
    manager: &BackupManager,
    paths: &BookstorePaths,
    backup: &str,
) -> BookstoreResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .get_latest_backup()?
            .map(|b| b.path)
            .ok_or_else(|| BookstoreError::backup_not_found("latest"));
    }

    let path = PathBuf::from(backup);
    if path.is_file() {
        return Ok(path);
    }

    let in_backup_dir = paths.backup_dir().join(backup);
    if in_backup_dir.is_file() {
        return Ok(in_backup_dir);
    }

    Err(BookstoreError::backup_not_found(backup))
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    format!("{}d", hours / 24)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_duration(chrono::Duration::minutes(5)), "5m");
        assert_eq!(format_duration(chrono::Duration::hours(3)), "3h");
        assert_eq!(format_duration(chrono::Duration::days(2)), "2d");
        assert_eq!(format_duration(chrono::Duration::seconds(-5)), "0s");
    }
}
