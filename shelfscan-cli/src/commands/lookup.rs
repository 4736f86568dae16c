//! Lookup command implementation

use anyhow::{bail, Context, Result};
use serde::Serialize;
use shelfscan_core::{Isbn, MetadataResolver, OpenLibraryClient, ScanConfig};

/// Lookup output
#[derive(Serialize)]
struct LookupInfo {
    isbn: String,
    title: String,
    author: Option<String>,
    number_of_pages: Option<u32>,
}

/// Resolve an ISBN against the lookup service and print what it knows
pub async fn lookup(config: &ScanConfig, isbn: &str, json: bool) -> Result<()> {
    let isbn = Isbn::new(isbn.trim())
        .with_context(|| format!("'{}' is not a 10-13 digit ISBN", isbn))?;

    let client = OpenLibraryClient::new(config)?;
    let Some(metadata) = client
        .resolve(&isbn)
        .await
        .with_context(|| format!("Failed to look up {}", isbn.bibkey()))?
    else {
        bail!("Book details not found for {}", isbn.bibkey());
    };

    let info = LookupInfo {
        isbn: isbn.to_string(),
        title: metadata.title.clone(),
        author: metadata.author.clone(),
        number_of_pages: metadata.number_of_pages,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("ISBN:    {}", info.isbn);
        println!("Title:   {}", info.title);
        println!("Author:  {}", metadata.display_author());
        if let Some(pages) = info.number_of_pages {
            println!("Pages:   {}", pages);
        }
    }

    Ok(())
}
