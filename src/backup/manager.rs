//! Backup manager for the bookstore catalog
//!
//! Snapshots the database file to timestamped copies and keeps only the
//! newest ones.
//!
//! Snapshot names are `backup_livraria_YYYY-MM-DD_HH-MM-SS.db`. Further
//! snapshots taken within the same second get a sequence suffix
//! (`..._HH-MM-SS_1.db`, `_2`, ...) one past the highest suffix present.
//! Retention always keeps the newest snapshot, so as long as the cap is at
//! least one a name is never reused, even after older ones were deleted.
//!
//! Retention orders snapshots newest first by modification time. Equal
//! modification times are ordered by the timestamp and sequence number in
//! the filename, then by the filename itself, so the order is total and
//! stable even when several snapshots land in the same second.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::config::paths::BookstorePaths;
use crate::config::settings::BackupRetention;
use crate::error::{BookstoreError, BookstoreResult};

/// Filename prefix shared by all snapshots
pub const BACKUP_PREFIX: &str = "backup_livraria_";

/// Filename extension of snapshots
pub const BACKUP_EXTENSION: &str = ".db";

/// strftime format of the timestamp embedded in snapshot names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Metadata about a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    /// Snapshot filename
    pub filename: String,
    /// Full path to the snapshot
    pub path: PathBuf,
    /// Timestamp embedded in the filename (local time)
    pub created_at: NaiveDateTime,
    /// Collision counter within the same second (0 for the first snapshot)
    pub sequence: u32,
    /// Size in bytes
    pub size_bytes: u64,
    /// File modification time
    #[serde(skip)]
    pub modified: SystemTime,
}

impl BackupInfo {
    /// Newest-first ordering used by listing and retention
    fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.modified
            .cmp(&a.modified)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.sequence.cmp(&a.sequence))
            .then_with(|| b.filename.cmp(&a.filename))
    }
}

/// Manages snapshot creation and retention
pub struct BackupManager {
    /// Path to backup directory
    backup_dir: PathBuf,
    /// Database file being protected
    database_file: PathBuf,
    /// Retention policy
    retention: BackupRetention,
}

impl BackupManager {
    /// Create a new BackupManager
    pub fn new(paths: &BookstorePaths, retention: BackupRetention) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            database_file: paths.database_file(),
            retention,
        }
    }

    /// Snapshot the database file and enforce the retention cap
    ///
    /// Returns `None` when there is no database file yet; there is nothing
    /// to protect in that case.
    pub fn snapshot(&self) -> BookstoreResult<Option<PathBuf>> {
        let snapshot = self.snapshot_unpruned()?;
        if snapshot.is_some() {
            self.enforce_retention(self.retention.max_backups)?;
        }
        Ok(snapshot)
    }

    /// Snapshot the database file without applying the retention cap
    ///
    /// The caller is responsible for pruning afterwards, typically with
    /// [`BackupManager::enforce_retention_protecting`].
    pub fn snapshot_unpruned(&self) -> BookstoreResult<Option<PathBuf>> {
        if !self.database_file.exists() {
            tracing::debug!(
                path = %self.database_file.display(),
                "no database file, skipping snapshot"
            );
            return Ok(None);
        }

        self.create_backup().map(Some)
    }

    /// Copy the database file to a new snapshot without applying retention
    fn create_backup(&self) -> BookstoreResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            BookstoreError::Backup(format!("Failed to create backup directory: {}", e))
        })?;

        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let backup_path = self.next_free_path(&stamp)?;

        fs::copy(&self.database_file, &backup_path).map_err(|e| {
            BookstoreError::Backup(format!(
                "Failed to copy {} to {}: {}",
                self.database_file.display(),
                backup_path.display(),
                e
            ))
        })?;

        // Some platforms carry the source mtime over on copy.
        fs::File::options()
            .write(true)
            .open(&backup_path)
            .and_then(|file| file.set_modified(SystemTime::now()))
            .map_err(|e| {
                BookstoreError::Backup(format!("Failed to stamp snapshot time: {}", e))
            })?;

        tracing::info!(path = %backup_path.display(), "snapshot created");
        Ok(backup_path)
    }

    /// Snapshot path for the given timestamp, one past the highest sequence in use
    fn next_free_path(&self, stamp: &str) -> BookstoreResult<PathBuf> {
        let highest = self
            .list_backups()?
            .into_iter()
            .filter(|b| b.created_at.format(TIMESTAMP_FORMAT).to_string() == stamp)
            .map(|b| b.sequence)
            .max();
        let sequence = highest.map_or(0, |seq| seq + 1);
        Ok(self.backup_dir.join(backup_filename(stamp, sequence)))
    }

    /// List all snapshots, newest first
    pub fn list_backups(&self) -> BookstoreResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            BookstoreError::Backup(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                BookstoreError::Backup(format!("Failed to read directory entry: {}", e))
            })?;

            if let Some(info) = parse_backup_info(&entry.path()) {
                backups.push(info);
            }
        }

        backups.sort_by(BackupInfo::newest_first);

        Ok(backups)
    }

    /// Delete every snapshot beyond the newest `max_backups`
    ///
    /// Returns the paths that were deleted.
    pub fn enforce_retention(&self, max_backups: usize) -> BookstoreResult<Vec<PathBuf>> {
        self.prune(max_backups, None)
    }

    /// Like [`BackupManager::enforce_retention`], but never deletes `protected`
    ///
    /// The protected snapshot still counts toward the cap, so the older
    /// unprotected ones make room for it.
    pub fn enforce_retention_protecting(
        &self,
        max_backups: usize,
        protected: &Path,
    ) -> BookstoreResult<Vec<PathBuf>> {
        self.prune(max_backups, Some(protected))
    }

    fn prune(&self, max_backups: usize, protected: Option<&Path>) -> BookstoreResult<Vec<PathBuf>> {
        let protected = protected.and_then(|path| fs::canonicalize(path).ok());
        let is_protected = |backup: &BackupInfo| {
            protected.is_some()
                && fs::canonicalize(&backup.path).ok() == protected
        };

        let (kept, candidates): (Vec<BackupInfo>, Vec<BackupInfo>) =
            self.list_backups()?.into_iter().partition(|b| is_protected(b));
        let room = max_backups.saturating_sub(kept.len());
        let mut deleted = Vec::new();

        for backup in candidates.into_iter().skip(room) {
            fs::remove_file(&backup.path).map_err(|e| {
                BookstoreError::Backup(format!(
                    "Failed to delete old backup {}: {}",
                    backup.filename, e
                ))
            })?;
            tracing::debug!(file = %backup.filename, "old snapshot removed");
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Configured retention cap
    pub fn max_backups(&self) -> usize {
        self.retention.max_backups
    }

    /// Get a specific snapshot by filename
    pub fn get_backup(&self, filename: &str) -> BookstoreResult<Option<BackupInfo>> {
        let path = self.backup_dir.join(filename);
        if path.exists() {
            Ok(parse_backup_info(&path))
        } else {
            Ok(None)
        }
    }

    /// Get the most recent snapshot
    pub fn get_latest_backup(&self) -> BookstoreResult<Option<BackupInfo>> {
        let backups = self.list_backups()?;
        Ok(backups.into_iter().next())
    }
}

/// Build a snapshot filename from a timestamp and a sequence number
fn backup_filename(stamp: &str, sequence: u32) -> String {
    if sequence == 0 {
        format!("{}{}{}", BACKUP_PREFIX, stamp, BACKUP_EXTENSION)
    } else {
        format!("{}{}_{}{}", BACKUP_PREFIX, stamp, sequence, BACKUP_EXTENSION)
    }
}

/// Parse snapshot info from a path; `None` for files that are not snapshots
fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let (created_at, sequence) = parse_backup_name(&filename)?;

    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        sequence,
        size_bytes: metadata.len(),
        modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
    })
}

/// Parse the timestamp and sequence number out of a snapshot filename
fn parse_backup_name(filename: &str) -> Option<(NaiveDateTime, u32)> {
    let body = filename
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(BACKUP_EXTENSION)?;

    // YYYY-MM-DD_HH-MM-SS is 19 characters
    if body.len() < 19 || !body.is_char_boundary(19) {
        return None;
    }
    let (stamp, rest) = body.split_at(19);
    let created_at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;

    let sequence = match rest {
        "" => 0,
        _ => rest.strip_prefix('_')?.parse().ok()?,
    };

    Some((created_at, sequence))
}
