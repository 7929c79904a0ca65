//! Core data models for the bookstore catalog
//!
//! The catalog holds a single entity: the book record.

pub mod book;
pub mod ids;

pub use book::{Book, BookValidationError, NewBook};
pub use ids::BookId;
