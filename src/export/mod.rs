//! Export functionality for the bookstore catalog
//!
//! Writes the catalog to CSV with the `id,titulo,autor,ano_publicacao,preco`
//! header. The same layout is accepted back by the importer.

pub mod csv;

pub use self::csv::{export_books_csv, write_books_csv_file, CSV_HEADER};
