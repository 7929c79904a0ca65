//! Interactive menu
//!
//! A numbered text menu over the catalog. Each choice prompts for its
//! parameters, runs one catalog operation, and prints the outcome. Errors
//! are printed and the menu comes back; only option 9 or end of input
//! leaves the loop.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::paths::BookstorePaths;
use crate::config::settings::Settings;
use crate::display::format_book_list;
use crate::error::{BookstoreError, BookstoreResult};
use crate::models::{Book, NewBook};
use crate::services::{CatalogService, ImportService};

const MENU: &str = "
=== BOOKSTORE ===
1 Add book
2 List books
3 Update a book's price
4 Remove book
5 Search books by author
6 Export data to CSV
7 Import data from CSV
8 Back up the database
9 Quit
";

/// What the loop should do after a choice
enum Flow {
    Continue,
    Quit,
}

/// Runs the interactive menu over arbitrary input and output streams
pub struct Menu<'a, 'b, R, W> {
    catalog: &'b CatalogService<'a>,
    paths: &'b BookstorePaths,
    settings: &'b Settings,
    input: R,
    output: W,
}

impl<'a, 'b, R: BufRead, W: Write> Menu<'a, 'b, R, W> {
    /// Create a menu reading choices from `input` and printing to `output`
    pub fn new(
        catalog: &'b CatalogService<'a>,
        paths: &'b BookstorePaths,
        settings: &'b Settings,
        input: R,
        output: W,
    ) -> Self {
        Self {
            catalog,
            paths,
            settings,
            input,
            output,
        }
    }

    /// Loop until the user quits or input ends
    ///
    /// Only a failure to write to the output stops the loop with an error.
    pub fn run(&mut self) -> BookstoreResult<()> {
        loop {
            write!(self.output, "{}", MENU)?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };

            match self.dispatch(choice.trim()) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(err) => writeln!(self.output, "Error: {}", err)?,
            }
        }
    }

    fn dispatch(&mut self, choice: &str) -> BookstoreResult<Flow> {
        match choice {
            "1" => self.add_book()?,
            "2" => {
                let books = self.catalog.list_all()?;
                self.print_books(&books)?;
            }
            "3" => {
                let Some(title) = self.prompt("Book title: ")? else {
                    return Ok(Flow::Quit);
                };
                let Some(price) = self.prompt("New price: ")? else {
                    return Ok(Flow::Quit);
                };
                let price = parse_price(&price)?.ok_or_else(|| {
                    BookstoreError::Validation("A new price is required".into())
                })?;
                let updated = self.catalog.update_price(&title, price)?;
                writeln!(self.output, "Updated the price of {} book(s).", updated)?;
            }
            "4" => {
                let Some(title) = self.prompt("Title of the book to remove: ")? else {
                    return Ok(Flow::Quit);
                };
                let removed = self.catalog.delete(&title)?;
                writeln!(self.output, "Removed {} book(s).", removed)?;
            }
            "5" => {
                let Some(author) = self.prompt("Author name: ")? else {
                    return Ok(Flow::Quit);
                };
                let books = self.catalog.search_by_author(&author)?;
                self.print_books(&books)?;
            }
            "6" => {
                let destination = self.paths.default_export_file();
                let count = self.catalog.export_csv(&destination)?;
                writeln!(
                    self.output,
                    "Exported {} book(s) to {}",
                    count,
                    destination.display()
                )?;
            }
            "7" => {
                let Some(path) = self.prompt("CSV file path: ")? else {
                    return Ok(Flow::Quit);
                };
                let result = ImportService::new(self.catalog).import_csv(&PathBuf::from(path))?;
                writeln!(self.output, "Imported {} book(s).", result.imported)?;
            }
            "8" => match self.catalog.backup_now()? {
                Some(path) => writeln!(self.output, "Backup created: {}", path.display())?,
                None => writeln!(self.output, "Nothing to back up yet.")?,
            },
            "9" => return Ok(Flow::Quit),
            _ => writeln!(self.output, "Invalid option!")?,
        }

        Ok(Flow::Continue)
    }

    fn add_book(&mut self) -> BookstoreResult<()> {
        let mut fields = Vec::with_capacity(4);
        for label in ["Title: ", "Author: ", "Publication year: ", "Price: "] {
            match self.prompt(label)? {
                Some(value) => fields.push(value),
                None => return Ok(()),
            }
        }

        let year = match fields[2].trim() {
            "" => None,
            text => Some(text.parse::<i32>().map_err(|_| {
                BookstoreError::Validation(format!("Invalid year: {}", text))
            })?),
        };

        let book = NewBook {
            title: fields[0].clone(),
            author: fields[1].clone(),
            year,
            price: parse_price(&fields[3])?,
        };

        let id = self.catalog.insert(&book)?;
        writeln!(self.output, "Added book #{}.", id)?;
        Ok(())
    }

    fn print_books(&mut self, books: &[Book]) -> BookstoreResult<()> {
        writeln!(
            self.output,
            "{}",
            format_book_list(books, &self.settings.currency_symbol)
        )?;
        Ok(())
    }

    /// Print a label and read one line; `None` at end of input
    fn prompt(&mut self, label: &str) -> BookstoreResult<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Parse an optional price, accepting a decimal comma
fn parse_price(text: &str) -> BookstoreResult<Option<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    text.replace(',', ".")
        .parse::<f64>()
        .map(Some)
        .map_err(|_| BookstoreError::Validation(format!("Invalid price: {}", text)))
}
