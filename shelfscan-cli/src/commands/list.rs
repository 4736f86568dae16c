//! List command implementation (the dashboard)

use anyhow::Result;
use shelfscan_core::{ScanConfig, SessionContext};

/// Greet the user and show their books in scan order
pub async fn list(config: &ScanConfig, session: &SessionContext, json: bool) -> Result<()> {
    let store = super::open_store(config, session);
    let books = store.load_all().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    println!("Welcome, {}", session.display_name());
    if books.is_empty() {
        println!("No books scanned yet.");
        return Ok(());
    }

    println!();
    for (i, book) in books.iter().enumerate() {
        println!("{:>3}. {} by {}", i + 1, book.title, book.author);
        println!(
            "     ISBN {} | {} pages | scanned {}",
            book.isbn,
            book.number_of_pages,
            book.timestamp.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}
