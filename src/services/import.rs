//! CSV Import service
//!
//! Loads books from a header-named CSV file. The columns `titulo`, `autor`,
//! `ano_publicacao` and `preco` must be present; any other column (such as
//! the `id` written by the exporter) is ignored.
//!
//! The whole file is inserted inside one SQLite transaction. It is committed
//! only after every row converted and inserted; the first bad row rolls the
//! transaction back, leaving the table exactly as it was.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Reader, StringRecord};

use crate::audit::{AuditEntry, Operation};
use crate::error::{BookstoreError, BookstoreResult};
use crate::models::NewBook;
use crate::services::CatalogService;
use crate::storage::BookRepository;

/// Columns an import file must provide
pub const REQUIRED_COLUMNS: [&str; 4] = ["titulo", "autor", "ano_publicacao", "preco"];

/// Positions of the required columns in the file's header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub title: usize,
    pub author: usize,
    pub year: usize,
    pub price: usize,
}

impl ColumnMapping {
    /// Locate the required columns by name
    pub fn from_headers(headers: &StringRecord) -> BookstoreResult<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|&name| position(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(BookstoreError::Import(format!(
                "Missing required column(s): {}",
                missing.join(", ")
            )));
        }

        // Every lookup succeeded above
        Ok(Self {
            title: position("titulo").unwrap_or_default(),
            author: position("autor").unwrap_or_default(),
            year: position("ano_publicacao").unwrap_or_default(),
            price: position("preco").unwrap_or_default(),
        })
    }

    /// Convert one data row into a book
    ///
    /// `row_number` is the 1-based data row, used in error messages. Title
    /// and author are taken verbatim; only the numeric fields are trimmed.
    pub fn parse_row(&self, record: &StringRecord, row_number: usize) -> BookstoreResult<NewBook> {
        let raw = |index: usize| record.get(index).unwrap_or("");
        let field = |index: usize| raw(index).trim();

        let year = match field(self.year) {
            "" => None,
            text => Some(text.parse::<i32>().map_err(|e| {
                BookstoreError::Import(format!(
                    "Row {}: invalid ano_publicacao '{}': {}",
                    row_number, text, e
                ))
            })?),
        };

        let price = match field(self.price) {
            "" => None,
            text => Some(text.parse::<f64>().map_err(|e| {
                BookstoreError::Import(format!(
                    "Row {}: invalid preco '{}': {}",
                    row_number, text, e
                ))
            })?),
        };

        let book = NewBook {
            title: raw(self.title).to_string(),
            author: raw(self.author).to_string(),
            year,
            price,
        };
        book.validate()
            .map_err(|e| BookstoreError::Import(format!("Row {}: {}", row_number, e)))?;

        Ok(book)
    }
}

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Number of books inserted
    pub imported: usize,
    /// Snapshot taken before the import
    pub snapshot: Option<PathBuf>,
}

/// Service for importing books from CSV
pub struct ImportService<'a, 'b> {
    catalog: &'b CatalogService<'a>,
}

impl<'a, 'b> ImportService<'a, 'b> {
    /// Create a new import service on top of a catalog
    pub fn new(catalog: &'b CatalogService<'a>) -> Self {
        Self { catalog }
    }

    /// Import every row of `source` as a new book, all or nothing
    pub fn import_csv(&self, source: &Path) -> BookstoreResult<ImportResult> {
        // Fail on an unreadable file before taking a snapshot
        let file = File::open(source).map_err(|e| {
            BookstoreError::Import(format!("Failed to open {}: {}", source.display(), e))
        })?;

        let (imported, snapshot) = self.catalog.guarded(|conn| {
            let mut reader = Reader::from_reader(file);
            let headers = reader
                .headers()
                .map_err(|e| BookstoreError::Import(format!("Failed to read header: {}", e)))?
                .clone();
            let mapping = ColumnMapping::from_headers(&headers)?;

            let tx = conn.transaction()?;
            let books = BookRepository::new();
            let mut imported = 0;

            for (index, record) in reader.records().enumerate() {
                let row_number = index + 1;
                let record = record.map_err(|e| {
                    BookstoreError::Import(format!("Row {}: {}", row_number, e))
                })?;
                let book = mapping.parse_row(&record, row_number)?;
                books.insert(&tx, &book)?;
                imported += 1;
            }

            // Dropping `tx` on any early return above rolls back
            tx.commit()?;
            Ok(imported)
        })?;

        self.catalog.record(
            &AuditEntry::new(
                Operation::Import,
                Some(source.display().to_string()),
                imported,
            )
            .with_snapshot(snapshot.as_deref()),
        );

        tracing::info!(path = %source.display(), imported, "catalog imported");
        Ok(ImportResult { imported, snapshot })
    }
}
