//! Book CLI commands
//!
//! Implements the one-shot commands for adding, listing, repricing,
//! removing and searching books.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_book_list;
use crate::error::BookstoreResult;
use crate::models::NewBook;
use crate::services::CatalogService;

/// Book subcommands
#[derive(Subcommand)]
pub enum BookCommands {
    /// Add a new book
    Add {
        /// Book title
        title: String,
        /// Author name
        author: String,
        /// Publication year
        #[arg(short, long)]
        year: Option<i32>,
        /// Price (e.g., "39.90")
        #[arg(short, long)]
        price: Option<f64>,
    },
    /// List all books
    #[command(alias = "ls")]
    List,
    /// Set the price of every book whose title contains the given text
    UpdatePrice {
        /// Text contained in the title
        title: String,
        /// New price
        price: f64,
    },
    /// Remove every book whose title contains the given text
    #[command(alias = "rm")]
    Remove {
        /// Text contained in the title
        title: String,
    },
    /// Find books whose author contains the given text
    Search {
        /// Text contained in the author name
        author: String,
    },
}

/// Handle a book command
pub fn handle_book_command(
    catalog: &CatalogService,
    settings: &Settings,
    cmd: BookCommands,
) -> BookstoreResult<()> {
    match cmd {
        BookCommands::Add {
            title,
            author,
            year,
            price,
        } => {
            let book = NewBook {
                title,
                author,
                year,
                price,
            };
            let id = catalog.insert(&book)?;
            println!("Added book #{}: {}", id, book.title);
        }

        BookCommands::List => {
            let books = catalog.list_all()?;
            println!("{}", format_book_list(&books, &settings.currency_symbol));
        }

        BookCommands::UpdatePrice { title, price } => {
            let updated = catalog.update_price(&title, price)?;
            if updated == 0 {
                println!("No books with '{}' in the title.", title);
            } else {
                println!("Updated the price of {} book(s).", updated);
            }
        }

        BookCommands::Remove { title } => {
            let removed = catalog.delete(&title)?;
            println!("Removed {} book(s).", removed);
        }

        BookCommands::Search { author } => {
            let books = catalog.search_by_author(&author)?;
            println!("{}", format_book_list(&books, &settings.currency_symbol));
        }
    }

    Ok(())
}
