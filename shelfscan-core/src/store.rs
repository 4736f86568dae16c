//! Local Book Store: the persisted, append-only list of scanned books

use crate::error::{PersistenceError, StorageError};
use crate::session::SessionContext;
use crate::storage::StorageProvider;
use crate::types::BookRecord;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Ordered list of [`BookRecord`]s stored as one JSON array under a single key
pub struct BookStore {
    storage: Arc<dyn StorageProvider>,
    key: String,
    /// User the list belongs to, when opened for a session
    owner: Option<String>,
    /// Serializes read-append-write cycles
    write_lock: Mutex<()>,
}

impl BookStore {
    /// Create a store over an explicit storage key
    pub fn new(storage: Arc<dyn StorageProvider>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            owner: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Create the store holding the given user's books (`books/<user>.json`)
    pub fn for_session(storage: Arc<dyn StorageProvider>, session: &SessionContext) -> Self {
        Self {
            owner: Some(session.user_id().to_string()),
            ..Self::new(storage, format!("books/{}.json", session.storage_key()))
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether `session` may write to this list
    ///
    /// Stores opened with an explicit key have no owner and accept any session.
    pub fn belongs_to(&self, session: &SessionContext) -> bool {
        self.owner
            .as_deref()
            .map_or(true, |owner| owner == session.user_id())
    }

    /// Current persisted list
    ///
    /// Missing data, unreadable storage and unparsable payloads all yield an empty list.
    pub async fn load_all(&self) -> Vec<BookRecord> {
        match self.read_current().await {
            Ok(books) => books,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to read book list, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Append `record` and write the full list back
    ///
    /// Returns the record as stored. Its timestamp is raised to the previous
    /// record's if the clock went backwards, so stored order stays monotonic.
    pub async fn append_and_persist(
        &self,
        mut record: BookRecord,
    ) -> Result<BookRecord, PersistenceError> {
        let _guard = self.write_lock.lock().await;

        let mut books = self.read_current().await?;
        if let Some(last) = books.last() {
            if record.timestamp < last.timestamp {
                record.timestamp = last.timestamp;
            }
        }
        books.push(record.clone());

        let data =
            serde_json::to_vec(&books).map_err(|e| PersistenceError::Serialize(e.to_string()))?;
        self.storage.write(&self.key, data).await?;

        tracing::debug!(key = %self.key, id = %record.id, count = books.len(), "Persisted book list");
        Ok(record)
    }

    /// Read the stored list; only backend failures are errors
    async fn read_current(&self) -> Result<Vec<BookRecord>, StorageError> {
        let data = match self.storage.read(&self.key).await {
            Ok(data) => data,
            Err(StorageError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        match serde_json::from_slice(&data) {
            Ok(books) => Ok(books),
            Err(e) => {
                tracing::warn!(key = %self.key, "Stored book list is not valid JSON: {}", e);
                Ok(Vec::new())
            }
        }
    }
}
