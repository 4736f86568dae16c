//! Core domain types for scanned books

mod book;
mod metadata;

pub use book::BookRecord;
pub use metadata::{BookMetadata, UNKNOWN_AUTHOR};
