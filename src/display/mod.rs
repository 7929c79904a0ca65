//! Display formatting for terminal output
//!
//! Provides utilities for formatting catalog data for terminal display.

pub mod book;

pub use book::{format_book_list, format_price};
