//! Metadata Resolver backed by the Open Library books API
//!
//! `GET /api/books?bibkeys=ISBN:<digits>&format=json&jscmd=data` returns an
//! object keyed by the bibkey; an unknown ISBN yields `{}`.

use crate::config::ScanConfig;
use crate::error::{ConfigError, ResolutionError};
use crate::isbn::Isbn;
use crate::types::BookMetadata;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

const USER_AGENT: &str = concat!("shelfscan/", env!("CARGO_PKG_VERSION"));

/// Looks up bibliographic metadata by ISBN
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// `Ok(None)` means the service has no entry for this ISBN
    async fn resolve(&self, isbn: &Isbn) -> Result<Option<BookMetadata>, ResolutionError>;
}

#[derive(Debug, Deserialize)]
struct OpenLibraryBook {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<OpenLibraryAuthor>,
    number_of_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OpenLibraryAuthor {
    name: String,
}

/// Map a lookup response body to metadata for `isbn`
fn parse_books_response(
    isbn: &Isbn,
    body: &[u8],
) -> Result<Option<BookMetadata>, ResolutionError> {
    let mut books: HashMap<String, OpenLibraryBook> =
        serde_json::from_slice(body).map_err(|e| ResolutionError::Malformed(e.to_string()))?;

    let Some(book) = books.remove(&isbn.bibkey()) else {
        return Ok(None);
    };

    let title = book
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            ResolutionError::Malformed(format!("entry for {} has no title", isbn.bibkey()))
        })?;

    Ok(Some(BookMetadata {
        title,
        author: book.authors.into_iter().next().map(|a| a.name),
        number_of_pages: book.number_of_pages,
    }))
}

/// Open Library API client
pub struct OpenLibraryClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: &ScanConfig) -> Result<Self, ConfigError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.lookup_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MetadataResolver for OpenLibraryClient {
    async fn resolve(&self, isbn: &Isbn) -> Result<Option<BookMetadata>, ResolutionError> {
        let url = format!("{}/api/books", self.base_url);
        let bibkey = isbn.bibkey();

        tracing::debug!(url = %url, bibkey = %bibkey, "Querying Open Library");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("bibkeys", bibkey.as_str()),
                ("format", "json"),
                ("jscmd", "data"),
            ])
            .send()
            .await
            .map_err(|e| ResolutionError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResolutionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ResolutionError::Network(e.to_string()))?;

        let metadata = parse_books_response(isbn, &body)?;
        match &metadata {
            Some(m) => tracing::info!(isbn = %isbn, title = %m.title, "Resolved book metadata"),
            None => tracing::info!(isbn = %isbn, "No Open Library entry"),
        }
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn isbn() -> Isbn {
        Isbn::new("9780131103627").unwrap()
    }

    #[test]
    fn test_parse_full_entry() {
        let body = json!({
            "ISBN:9780131103627": {
                "title": "The C Programming Language",
                "authors": [
                    {"url": "https://openlibrary.org/authors/OL1A", "name": "Brian W. Kernighan"},
                    {"url": "https://openlibrary.org/authors/OL2A", "name": "Dennis M. Ritchie"}
                ],
                "number_of_pages": 272,
                "publishers": [{"name": "Prentice Hall"}]
            }
        });

        let metadata = parse_books_response(&isbn(), body.to_string().as_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(metadata.title, "The C Programming Language");
        assert_eq!(metadata.author.as_deref(), Some("Brian W. Kernighan"));
        assert_eq!(metadata.number_of_pages, Some(272));
    }

    #[test]
    fn test_parse_sparse_entry() {
        let body = json!({"ISBN:9780131103627": {"title": "Pamphlet"}});
        let metadata = parse_books_response(&isbn(), body.to_string().as_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(metadata.author, None);
        assert_eq!(metadata.number_of_pages, None);
        assert_eq!(metadata.display_author(), "Unknown author");
    }

    #[test]
    fn test_parse_missing_entry() {
        let result = parse_books_response(&isbn(), b"{}").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_parse_other_key_only() {
        let body = json!({"ISBN:0000000000": {"title": "Wrong"}});
        assert!(parse_books_response(&isbn(), body.to_string().as_bytes())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_parse_untitled_entry_is_malformed() {
        let body = json!({"ISBN:9780131103627": {"title": "  "}});
        assert!(matches!(
            parse_books_response(&isbn(), body.to_string().as_bytes()),
            Err(ResolutionError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        assert!(matches!(
            parse_books_response(&isbn(), b"not json"),
            Err(ResolutionError::Malformed(_))
        ));
    }
}
