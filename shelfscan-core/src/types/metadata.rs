//! Bibliographic metadata returned by the lookup service

use serde::{Deserialize, Serialize};

/// Placeholder shown when the lookup service lists no author
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Metadata resolved for a single ISBN
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookMetadata {
    /// Book title (never empty)
    pub title: String,

    /// First listed author, if any
    pub author: Option<String>,

    /// Page count, when the service reports one
    pub number_of_pages: Option<u32>,
}

impl BookMetadata {
    /// Create metadata with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: None,
            number_of_pages: None,
        }
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the page count
    pub fn with_pages(mut self, pages: u32) -> Self {
        self.number_of_pages = Some(pages);
        self
    }

    /// Author for display, falling back to a placeholder
    pub fn display_author(&self) -> &str {
        self.author.as_deref().unwrap_or(UNKNOWN_AUTHOR)
    }
}
