//! CSV Export functionality
//!
//! Writes book records as comma-separated UTF-8 with a fixed header.
//! Absent years and prices become empty fields.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{BookstoreError, BookstoreResult};
use crate::models::Book;

/// Header row of exported files, in column order
pub const CSV_HEADER: [&str; 5] = ["id", "titulo", "autor", "ano_publicacao", "preco"];

/// Export books to any writer as CSV
pub fn export_books_csv<W: Write>(books: &[Book], writer: W) -> BookstoreResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER).map_err(export_error)?;

    for book in books {
        csv_writer
            .write_record([
                book.id.to_string(),
                book.title.clone(),
                book.author.clone(),
                book.year.map(|y| y.to_string()).unwrap_or_default(),
                book.price.map(|p| p.to_string()).unwrap_or_default(),
            ])
            .map_err(export_error)?;
    }

    csv_writer
        .flush()
        .map_err(|e| BookstoreError::Export(format!("Failed to flush CSV: {}", e)))?;
    Ok(())
}

/// Export books to a file, creating parent directories and replacing any existing file
pub fn write_books_csv_file(path: &Path, books: &[Book]) -> BookstoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            BookstoreError::Export(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let file = File::create(path).map_err(|e| {
        BookstoreError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;

    export_books_csv(books, BufWriter::new(file))
}

fn export_error(err: csv::Error) -> BookstoreError {
    BookstoreError::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookId;

    fn book(id: i64, title: &str, year: Option<i32>, price: Option<f64>) -> Book {
        Book {
            id: BookId::from_raw(id),
            title: title.into(),
            author: "Frank Herbert".into(),
            year,
            price,
        }
    }

    fn export_to_string(books: &[Book]) -> String {
        let mut buffer = Vec::new();
        export_books_csv(books, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_header_only_for_empty_catalog() {
        assert_eq!(export_to_string(&[]), "id,titulo,autor,ano_publicacao,preco\n");
    }

    #[test]
    fn test_rows_use_natural_number_text() {
        let csv = export_to_string(&[book(1, "Dune", Some(1965), Some(39.9))]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[1], "1,Dune,Frank Herbert,1965,39.9");
    }

    #[test]
    fn test_absent_fields_are_empty() {
        let csv = export_to_string(&[book(2, "Dune Messiah", None, None)]);

        assert_eq!(csv.lines().nth(1).unwrap(), "2,Dune Messiah,Frank Herbert,,");
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let csv = export_to_string(&[book(3, "Children of Dune, Part 1", None, Some(10.5))]);

        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "3,\"Children of Dune, Part 1\",Frank Herbert,,10.5"
        );
    }
}
