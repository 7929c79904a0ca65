//! Catalog service
//!
//! The public contract for working with book records. Every mutation runs
//! through [`CatalogService::guarded`], which snapshots the database first
//! and refuses to touch it if the snapshot failed. Reads go straight to the
//! repository.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::backup::{BackupManager, RestoreManager, RestoreResult};
use crate::config::settings::Settings;
use crate::error::{BookstoreError, BookstoreResult};
use crate::export::csv::write_books_csv_file;
use crate::models::{Book, BookId, NewBook};
use crate::storage::Storage;

/// Service for catalog management
pub struct CatalogService<'a> {
    storage: &'a Storage,
    backups: BackupManager,
    audit: AuditLogger,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service
    pub fn new(storage: &'a Storage, settings: &Settings) -> Self {
        let paths = storage.paths();
        let audit = if settings.audit_enabled {
            AuditLogger::new(paths.audit_log())
        } else {
            AuditLogger::disabled(paths.audit_log())
        };

        Self {
            backups: BackupManager::new(paths, settings.backup_retention.clone()),
            audit,
            storage,
        }
    }

    /// Get the backup manager guarding this catalog
    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Append a journal entry for a change that already took effect
    ///
    /// A journal failure is logged and swallowed; the change stands either way.
    pub fn record(&self, entry: &AuditEntry) {
        if let Err(e) = self.audit.log(entry) {
            tracing::warn!(
                operation = %entry.operation,
                error = %e,
                "failed to write audit entry"
            );
        }
    }

    /// Run a mutation after a successful snapshot
    ///
    /// The snapshot is taken first; if it fails, the mutation never runs and
    /// the backup error is returned. On success the mutation gets its own
    /// connection, which is closed when it returns. Returns the mutation's
    /// value together with the snapshot path (`None` only when there was no
    /// database file to copy).
    pub fn guarded<T, F>(&self, mutation: F) -> BookstoreResult<(T, Option<PathBuf>)>
    where
        F: FnOnce(&mut Connection) -> BookstoreResult<T>,
    {
        let snapshot = self.backups.snapshot()?;
        let mut conn = self.storage.connect()?;
        let value = mutation(&mut conn)?;
        Ok((value, snapshot))
    }

    /// Add a book to the catalog
    pub fn insert(&self, book: &NewBook) -> BookstoreResult<BookId> {
        book.validate()
            .map_err(|e| BookstoreError::Validation(e.to_string()))?;

        let books = self.storage.books;
        let (id, snapshot) = self.guarded(|conn| books.insert(conn, book))?;

        let stored = Book {
            id,
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
            price: book.price,
        };
        self.record(&AuditEntry::create(id.to_string(), &stored).with_snapshot(snapshot.as_deref()));

        tracing::info!(%id, title = %book.title, "book added");
        Ok(id)
    }

    /// Get every book in the catalog
    pub fn list_all(&self) -> BookstoreResult<Vec<Book>> {
        let conn = self.storage.connect()?;
        self.storage.books.list_all(&conn)
    }

    /// Get every book whose author contains `author_substring`
    pub fn search_by_author(&self, author_substring: &str) -> BookstoreResult<Vec<Book>> {
        let conn = self.storage.connect()?;
        self.storage.books.search_by_author(&conn, author_substring)
    }

    /// Get every book whose title contains `title_substring`
    pub fn find_by_title(&self, title_substring: &str) -> BookstoreResult<Vec<Book>> {
        let conn = self.storage.connect()?;
        self.storage.books.find_by_title(&conn, title_substring)
    }

    /// Set the price of every book whose title contains `title_substring`
    ///
    /// Returns the number of updated books; zero matches is not an error.
    pub fn update_price(&self, title_substring: &str, new_price: f64) -> BookstoreResult<usize> {
        if !new_price.is_finite() {
            return Err(BookstoreError::Validation(format!(
                "Invalid price: {}",
                new_price
            )));
        }

        let books = self.storage.books;
        let ((before, after, updated), snapshot) = self.guarded(|conn| {
            let before = books.find_by_title(conn, title_substring)?;
            let updated = books.update_price_matching(conn, title_substring, Some(new_price))?;
            let after = books.find_by_title(conn, title_substring)?;
            Ok((before, after, updated))
        })?;

        if updated > 0 {
            self.record(
                &AuditEntry::update(title_substring, &before, &after)
                    .with_snapshot(snapshot.as_deref()),
            );
        }

        tracing::info!(filter = title_substring, updated, "prices updated");
        Ok(updated)
    }

    /// Remove every book whose title contains `title_substring`
    ///
    /// An empty substring matches, and removes, every book.
    pub fn delete(&self, title_substring: &str) -> BookstoreResult<usize> {
        let books = self.storage.books;
        let ((removed, deleted), snapshot) = self.guarded(|conn| {
            let removed = books.find_by_title(conn, title_substring)?;
            let deleted = books.delete_matching(conn, title_substring)?;
            Ok((removed, deleted))
        })?;

        if deleted > 0 {
            self.record(
                &AuditEntry::delete(title_substring, &removed).with_snapshot(snapshot.as_deref()),
            );
        }

        tracing::info!(filter = title_substring, deleted, "books removed");
        Ok(deleted)
    }

    /// Take a snapshot on request
    pub fn backup_now(&self) -> BookstoreResult<Option<PathBuf>> {
        self.backups.snapshot()
    }

    /// Replace the live database with the snapshot at `backup_path`
    ///
    /// The live database is snapshotted first so the restore can be undone.
    /// Retention runs only after the copy, and never deletes the snapshot
    /// being restored. Returns the restore result and the pre-restore
    /// snapshot.
    pub fn restore(&self, backup_path: &Path) -> BookstoreResult<(RestoreResult, Option<PathBuf>)> {
        let restorer = RestoreManager::new(self.storage.paths().clone());
        let validation = restorer.validate_backup(backup_path)?;
        if !validation.is_valid() {
            return Err(BookstoreError::Backup(format!(
                "{} does not contain a book table",
                backup_path.display()
            )));
        }

        let pre_restore = self.backups.snapshot_unpruned()?;
        let restored = restorer.restore_from_file(backup_path);
        self.backups
            .enforce_retention_protecting(self.backups.max_backups(), backup_path)?;
        let restored = restored?;

        let source = backup_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| backup_path.display().to_string());
        self.record(
            &AuditEntry::new(Operation::Restore, Some(source), restored.book_count)
                .with_snapshot(pre_restore.as_deref()),
        );

        Ok((restored, pre_restore))
    }

    /// Write every book to a CSV file, replacing it if present
    ///
    /// Returns the number of exported books.
    pub fn export_csv(&self, destination: &Path) -> BookstoreResult<usize> {
        let books = self.list_all()?;
        write_books_csv_file(destination, &books)?;

        tracing::info!(path = %destination.display(), rows = books.len(), "catalog exported");
        Ok(books.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BookstorePaths;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (Storage, Settings, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BookstorePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (storage, Settings::default(), temp_dir)
    }

    fn dune() -> NewBook {
        NewBook::new("Dune", "Frank Herbert")
            .with_year(1965)
            .with_price(39.90)
    }

    fn duna() -> NewBook {
        NewBook::new("Duna", "Herbert").with_year(1984).with_price(25.00)
    }

    #[test]
    fn test_insert_adds_exactly_one_record() {
        let (storage, settings, _temp) = setup();
        let service = CatalogService::new(&storage, &settings);

        let first = service.insert(&dune()).unwrap();
        let before = service.list_all().unwrap();
        let second = service.insert(&duna()).unwrap();
        let after = service.list_all().unwrap();

        assert_eq!(after.len(), before.len() + 1);
        assert!(second > first);
        let added = after.iter().find(|b| b.id == second).unwrap();
        assert_eq!(added.title, "Duna");
        assert_eq!(added.author, "Herbert");
        assert_eq!(added.year, Some(1984));
        assert_eq!(added.price, Some(25.00));
    }

    #[test]
    fn test_insert_rejects_empty_title() {
        let (storage, settings, _temp) = setup();
        let service = CatalogService::new(&storage, &settings);

        let err = service.insert(&NewBook::new("", "Someone")).unwrap_err();

        assert!(err.is_validation());
        assert!(service.backups().list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_every_mutation_takes_a_snapshot() {
        let (storage, settings, _temp) = setup();
        let service = CatalogService::new(&storage, &settings);

        service.insert(&dune()).unwrap();
        assert_eq!(service.backups().list_backups().unwrap().len(), 1);

        service.update_price("Dune", 10.0).unwrap();
        assert_eq!(service.backups().list_backups().unwrap().len(), 2);

        service.delete("Dune").unwrap();
        assert_eq!(service.backups().list_backups().unwrap().len(), 3);

        service.list_all().unwrap();
        service.search_by_author("Herbert").unwrap();
        assert_eq!(service.backups().list_backups().unwrap().len(), 3);
    }

    #[test]
    fn test_snapshot_holds_pre_mutation_state() {
        let (storage, settings, _temp) = setup();
        let service = CatalogService::new(&storage, &settings);
        service.insert(&dune()).unwrap();

        service.delete("Dune").unwrap();

        let latest = service.backups().get_latest_backup().unwrap().unwrap();
        let conn = Connection::open(&latest.path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM livros", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_retention_cap_over_many_mutations() {
        let (storage, settings, _temp) = setup();
        let service = CatalogService::new(&storage, &settings);

        let mut snapshots = Vec::new();
        for i in 0..9 {
            service
                .guarded(|_| Ok(()))
                .map(|(_, snapshot)| snapshots.push(snapshot.unwrap()))
                .unwrap();
            service.insert(&NewBook::new(format!("Book {}", i), "Author")).unwrap();
        }

        let remaining: Vec<PathBuf> = service
            .backups()
            .list_backups()
            .unwrap()
            .into_iter()
            .map(|b| b.path)
            .collect();
        assert_eq!(remaining.len(), 5);
        assert!(!remaining.contains(&snapshots[0]));
    }

    #[test]
    fn test_failed_snapshot_aborts_mutation() {
        let (storage, settings, _temp) = setup();
        let service = CatalogService::new(&storage, &settings);
        service.insert(&dune()).unwrap();

        // Replace the backup directory with a file so the copy cannot succeed
        let backup_dir = storage.paths().backup_dir();
        fs::remove_dir_all(&backup_dir).unwrap();
        fs::write(&backup_dir, b"blocked").unwrap();

        let err = service.delete("Dune").unwrap_err();
        assert!(err.is_backup());
        assert_eq!(service.list_all().unwrap().len(), 1);

        let err = service.insert(&duna()).unwrap_err();
        assert!(err.is_backup());
        assert_eq!(service.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_update_price_without_match() {
        let (storage, settings, _temp) = setup();
        let service = CatalogService::new(&storage, &settings);
        service.insert(&dune()).unwrap();
        let before = service.list_all().unwrap();

        let updated = service.update_price("Hobbit", 29.90).unwrap();

        assert_eq!(updated, 0);
        assert_eq!(service.list_all().unwrap(), before);
    }

    #[test]
    fn test_delete_empty_substring_removes_everything() {
        let (storage, settings, _temp) = setup();
        let service = CatalogService::new(&storage, &settings);
        service.insert(&dune()).unwrap();
        service.insert(&duna()).unwrap();

        assert_eq!(service.delete("").unwrap(), 2);
        assert!(service.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_dune_scenario() {
        let (storage, settings, _temp) = setup();
        let service = CatalogService::new(&storage, &settings);
        service.insert(&dune()).unwrap();
        service.insert(&duna()).unwrap();

        let found = service.search_by_author("Herbert").unwrap();
        assert_eq!(found.len(), 2);

        assert_eq!(service.update_price("Dun", 19.99).unwrap(), 2);
        assert!(service
            .list_all()
            .unwrap()
            .iter()
            .all(|b| b.price == Some(19.99)));
    }

    #[test]
    fn test_mutations_are_audited() {
        let (storage, settings, _temp) = setup();
        let service = CatalogService::new(&storage, &settings);

        service.insert(&dune()).unwrap();
        service.update_price("Dune", 12.5).unwrap();
        service.update_price("Hobbit", 1.0).unwrap();
        service.delete("Dune").unwrap();

        let entries = service.audit().read_all().unwrap();
        let ops: Vec<Operation> = entries.iter().map(|e| e.operation).collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);
        assert!(entries.iter().all(|e| e.snapshot.is_some()));
    }

    #[test]
    fn test_audit_can_be_disabled() {
        let (storage, mut settings, _temp) = setup();
        settings.audit_enabled = false;
        let service = CatalogService::new(&storage, &settings);

        service.insert(&dune()).unwrap();

        assert!(service.audit().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_export_overwrites_destination() {
        let (storage, settings, temp) = setup();
        let service = CatalogService::new(&storage, &settings);
        service.insert(&dune()).unwrap();
        let destination = temp.path().join("out").join("books.csv");

        fs::create_dir_all(destination.parent().unwrap()).unwrap();
        fs::write(&destination, "stale contents that should disappear\n").unwrap();

        assert_eq!(service.export_csv(&destination).unwrap(), 1);

        let contents = fs::read_to_string(&destination).unwrap();
        assert!(contents.starts_with("id,titulo,autor,ano_publicacao,preco\n"));
        assert!(!contents.contains("stale"));
        // Exports are reads and take no snapshot
        assert_eq!(service.backups().list_backups().unwrap().len(), 1);
    }

    #[test]
    fn test_audit_failure_does_not_fail_mutation() {
        let (storage, settings, _temp) = setup();
        let service = CatalogService::new(&storage, &settings);

        // A directory where the log file should be makes every append fail
        fs::create_dir_all(storage.paths().audit_log()).unwrap();

        let id = service.insert(&dune()).unwrap();
        assert_eq!(service.update_price("Dune", 10.0).unwrap(), 1);
        assert_eq!(service.list_all().unwrap()[0].id, id);
        assert_eq!(service.delete("Dune").unwrap(), 1);
        assert!(service.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_restore_oldest_snapshot_at_cap() {
        let (storage, settings, _temp) = setup();
        let service = CatalogService::new(&storage, &settings);
        for i in 0..5 {
            service.insert(&NewBook::new(format!("Book {}", i), "Author")).unwrap();
        }
        let backups = service.backups().list_backups().unwrap();
        assert_eq!(backups.len(), 5);
        let oldest = backups.last().unwrap().path.clone();

        let (result, pre_restore) = service.restore(&oldest).unwrap();

        assert_eq!(result.book_count, 0);
        assert!(service.list_all().unwrap().is_empty());
        assert!(oldest.exists());
        let pre_restore = pre_restore.unwrap();
        assert!(pre_restore.exists());
        assert_eq!(service.backups().list_backups().unwrap().len(), 5);

        let last = service.audit().read_all().unwrap().pop().unwrap();
        assert_eq!(last.operation, Operation::Restore);
        assert!(last.snapshot.is_some());

        // The pre-restore snapshot undoes the restore
        service.restore(&pre_restore).unwrap();
        assert_eq!(service.list_all().unwrap().len(), 5);
    }

    #[test]
    fn test_restore_rejects_missing_snapshot() {
        let (storage, settings, temp) = setup();
        let service = CatalogService::new(&storage, &settings);
        service.insert(&dune()).unwrap();

        let err = service.restore(&temp.path().join("nope.db")).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(service.backups().list_backups().unwrap().len(), 1);
        assert_eq!(service.list_all().unwrap().len(), 1);
    }
}
