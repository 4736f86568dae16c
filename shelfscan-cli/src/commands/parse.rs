//! Parse command implementation

use anyhow::{bail, Result};
use shelfscan_core::parse_isbn;

/// Print the ISBN found in `text`
pub fn parse(text: &str) -> Result<()> {
    match parse_isbn(text) {
        Some(isbn) => {
            println!("{}", isbn);
            Ok(())
        }
        None => bail!("No ISBN found in text"),
    }
}
