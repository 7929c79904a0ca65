//! Book model
//!
//! The only entity in the catalog. A `Book` is a stored row; a `NewBook`
//! carries the fields supplied when a record is created.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BookId;

/// A book record as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Identifier assigned by the database, never reused
    pub id: BookId,

    /// Book title
    pub title: String,

    /// Author name
    pub author: String,

    /// Publication year
    pub year: Option<i32>,

    /// Price
    pub price: Option<f64>,
}

impl Book {
    /// The insertable fields of this record, without its identifier
    pub fn to_new(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            year: self.year,
            price: self.price,
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} \"{}\" by {}", self.id, self.title, self.author)?;
        if let Some(year) = self.year {
            write!(f, " ({})", year)?;
        }
        if let Some(price) = self.price {
            write!(f, " - {:.2}", price)?;
        }
        Ok(())
    }
}

/// Fields for a book that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: Option<i32>,
    pub price: Option<f64>,
}

impl NewBook {
    /// Create a new book with title and author only
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year: None,
            price: None,
        }
    }

    /// Set the publication year
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the price
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Validate the book
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.trim().is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }

        if self.author.trim().is_empty() {
            return Err(BookValidationError::EmptyAuthor);
        }

        if let Some(price) = self.price {
            if !price.is_finite() {
                return Err(BookValidationError::InvalidPrice(price));
            }
        }

        Ok(())
    }
}

/// Validation errors for books
#[derive(Debug, Clone, PartialEq)]
pub enum BookValidationError {
    EmptyTitle,
    EmptyAuthor,
    InvalidPrice(f64),
}

impl fmt::Display for BookValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Book title cannot be empty"),
            Self::EmptyAuthor => write!(f, "Book author cannot be empty"),
            Self::InvalidPrice(price) => write!(f, "Invalid price: {}", price),
        }
    }
}

impl std::error::Error for BookValidationError {}
