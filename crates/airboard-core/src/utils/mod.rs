//! Utility functions for card text formatting.

pub mod format;

pub use format::{or_na, ticket_search_url, truncate_string};
