//! User settings for the bookstore catalog
//!
//! Manages user preferences including the backup retention cap and
//! whether mutations are written to the audit journal.

use serde::{Deserialize, Serialize};

use super::paths::BookstorePaths;
use crate::error::BookstoreError;

/// Default number of snapshots kept by the retention policy
pub const DEFAULT_MAX_BACKUPS: usize = 5;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of snapshots to keep, newest first
    pub max_backups: usize,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }
}

/// User settings for the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Currency symbol used when printing prices
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Whether mutations are recorded in the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "R$".to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backup_retention: BackupRetention::default(),
            currency_symbol: default_currency(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BookstorePaths) -> Result<Self, BookstoreError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BookstoreError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BookstoreError::Config(format!("Failed to parse settings file: {}", e))
            })?;
            settings.validate()?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Check values that deserialization alone cannot rule out
    ///
    /// At least one snapshot must be retained: a cap of zero would delete
    /// every snapshot right after taking it.
    pub fn validate(&self) -> Result<(), BookstoreError> {
        if self.backup_retention.max_backups == 0 {
            return Err(BookstoreError::Config(
                "backup_retention.max_backups must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BookstorePaths) -> Result<(), BookstoreError> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BookstoreError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BookstoreError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
