//! Book display formatting
//!
//! Formats books for terminal output as tables.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Book;

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "Price")]
    price: String,
}

/// Format a price with the configured currency symbol
pub fn format_price(price: Option<f64>, currency_symbol: &str) -> String {
    match price {
        Some(p) => format!("{} {:.2}", currency_symbol, p),
        None => "-".to_string(),
    }
}

/// Format a list of books as a table
pub fn format_book_list(books: &[Book], currency_symbol: &str) -> String {
    if books.is_empty() {
        return "No books found.".to_string();
    }

    let rows = books.iter().map(|book| BookRow {
        id: book.id.to_string(),
        title: book.title.clone(),
        author: book.author.clone(),
        year: book.year.map(|y| y.to_string()).unwrap_or_else(|| "-".into()),
        price: format_price(book.price, currency_symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());

    format!("{}\n{} book(s)", table, books.len())
}
