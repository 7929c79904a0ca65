//! Book repository
//!
//! Raw statements against the `livros` table. Every method borrows a
//! connection so callers decide the connection and transaction scope;
//! backups are taken one layer up, in the catalog service.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::BookstoreResult;
use crate::models::{Book, BookId, NewBook};

const SELECT_COLUMNS: &str = "SELECT id, titulo, autor, ano_publicacao, preco FROM livros";

/// Repository for book records
#[derive(Debug, Clone, Copy, Default)]
pub struct BookRepository;

impl BookRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self
    }

    /// Insert a book and return the identifier the database assigned
    pub fn insert(&self, conn: &Connection, book: &NewBook) -> BookstoreResult<BookId> {
        conn.execute(
            "INSERT INTO livros (titulo, autor, ano_publicacao, preco) VALUES (?1, ?2, ?3, ?4)",
            params![book.title, book.author, book.year, book.price],
        )?;
        Ok(BookId::from_raw(conn.last_insert_rowid()))
    }

    /// Get every book, in identifier order
    pub fn list_all(&self, conn: &Connection) -> BookstoreResult<Vec<Book>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
        let books = stmt
            .query_map([], book_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    /// Get a book by ID
    pub fn get(&self, conn: &Connection, id: BookId) -> BookstoreResult<Option<Book>> {
        let book = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                [id.as_i64()],
                book_from_row,
            )
            .optional()?;
        Ok(book)
    }

    /// Get every book whose title contains `title_substring`
    pub fn find_by_title(
        &self,
        conn: &Connection,
        title_substring: &str,
    ) -> BookstoreResult<Vec<Book>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE titulo LIKE ?1 ORDER BY id",
            SELECT_COLUMNS
        ))?;
        let books = stmt
            .query_map([contains_pattern(title_substring)], book_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    /// Get every book whose author contains `author_substring`
    pub fn search_by_author(
        &self,
        conn: &Connection,
        author_substring: &str,
    ) -> BookstoreResult<Vec<Book>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE autor LIKE ?1 ORDER BY id",
            SELECT_COLUMNS
        ))?;
        let books = stmt
            .query_map([contains_pattern(author_substring)], book_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    /// Set the price of every book whose title contains `title_substring`
    ///
    /// Returns the number of updated rows.
    pub fn update_price_matching(
        &self,
        conn: &Connection,
        title_substring: &str,
        new_price: Option<f64>,
    ) -> BookstoreResult<usize> {
        let updated = conn.execute(
            "UPDATE livros SET preco = ?1 WHERE titulo LIKE ?2",
            params![new_price, contains_pattern(title_substring)],
        )?;
        Ok(updated)
    }

    /// Delete every book whose title contains `title_substring`
    ///
    /// Returns the number of deleted rows.
    pub fn delete_matching(&self, conn: &Connection, title_substring: &str) -> BookstoreResult<usize> {
        let deleted = conn.execute(
            "DELETE FROM livros WHERE titulo LIKE ?1",
            [contains_pattern(title_substring)],
        )?;
        Ok(deleted)
    }

    /// Count stored books
    pub fn count(&self, conn: &Connection) -> BookstoreResult<usize> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM livros", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Wrap text in `%` so LIKE matches it anywhere in the column
fn contains_pattern(substring: &str) -> String {
    format!("%{}%", substring)
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: BookId::from_raw(row.get(0)?),
        title: row.get(1)?,
        author: row.get(2)?,
        year: row.get(3)?,
        price: row.get(4)?,
    })
}
