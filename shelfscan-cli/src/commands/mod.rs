//! CLI command implementations

mod list;
mod lookup;
mod parse;
mod scan;

pub use list::list;
pub use lookup::lookup;
pub use parse::parse;
pub use scan::scan;

use shelfscan_core::storage::LocalStorage;
use shelfscan_core::{BookStore, ScanConfig, SessionContext};
use std::sync::Arc;

/// The signed-in user's book store under the configured data directory
fn open_store(config: &ScanConfig, session: &SessionContext) -> BookStore {
    BookStore::for_session(Arc::new(LocalStorage::new(&config.data_dir)), session)
}
