//! The persisted BookRecord type

use super::BookMetadata;
use crate::isbn::Isbn;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One successfully resolved scan, as stored in the book list
///
/// Serialized with camelCase keys and a millisecond epoch timestamp so the
/// stored payload reads `{id, title, author, isbn, numberOfPages, timestamp}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Generated at creation, never changed
    pub id: String,

    pub title: String,

    pub author: String,

    pub isbn: String,

    /// Zero when the lookup service omitted the page count
    #[serde(default)]
    pub number_of_pages: u32,

    /// Capture time, rounded up to the next whole millisecond
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl BookRecord {
    /// Build a record from resolved metadata, stamped with the current time
    pub fn new(isbn: &Isbn, metadata: &BookMetadata) -> Self {
        Self::captured_at(isbn, metadata, Utc::now())
    }

    /// Build a record with an explicit capture time
    pub fn captured_at(isbn: &Isbn, metadata: &BookMetadata, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: metadata.title.clone(),
            author: metadata.display_author().to_string(),
            isbn: isbn.as_str().to_string(),
            number_of_pages: metadata.number_of_pages.unwrap_or(0),
            timestamp: ceil_to_millis(at),
        }
    }
}

/// Millisecond precision without ever stamping a record earlier than `at`
fn ceil_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = at.trunc_subsecs(3);
    if truncated < at {
        truncated + Duration::milliseconds(1)
    } else {
        truncated
    }
}
