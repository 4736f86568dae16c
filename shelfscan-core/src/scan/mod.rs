//! Scan Orchestrator
//!
//! Drives one capture through the pipeline:
//!
//! ```text
//! Idle -> Capturing -> Extracting -> Parsing -> Resolving -> Persisting -> Done
//!              \___________\____________\__________\___________\-> Aborted(reason)
//! ```
//!
//! Each stage awaits its predecessor. A failure at any stage ends the run
//! with a single notification and leaves the store untouched.

mod notify;
mod state;

pub use notify::{CollectingNotifier, Notification, Notifier};
pub use state::{AbortReason, ScanOutcome, ScanState};

use crate::capture::FrameSource;
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::isbn::parse_isbn;
use crate::lookup::{MetadataResolver, OpenLibraryClient};
use crate::session::SessionContext;
use crate::storage::LocalStorage;
use crate::store::BookStore;
use crate::types::BookRecord;
use crate::vision::{OpenAiVisionClient, VisionExtractor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Capacity of the state-transition channel
const EVENT_CAPACITY: usize = 32;

/// Clears the busy flag when a run ends, however it ends
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sequences capture, extraction, parsing, resolution and persistence
pub struct ScanOrchestrator {
    vision: Arc<dyn VisionExtractor>,
    resolver: Arc<dyn MetadataResolver>,
    store: Arc<BookStore>,
    notifier: Arc<dyn Notifier>,
    busy: AtomicBool,
    current: Mutex<ScanState>,
    event_tx: broadcast::Sender<ScanState>,
}

impl ScanOrchestrator {
    pub fn new(
        vision: Arc<dyn VisionExtractor>,
        resolver: Arc<dyn MetadataResolver>,
        store: Arc<BookStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            vision,
            resolver,
            store,
            notifier,
            busy: AtomicBool::new(false),
            current: Mutex::new(ScanState::Idle),
            event_tx,
        }
    }

    /// Wire the HTTP clients and the user's on-disk store from configuration
    pub fn from_config(
        config: &ScanConfig,
        session: &SessionContext,
        notifier: Arc<dyn Notifier>,
    ) -> crate::Result<Self> {
        let vision = OpenAiVisionClient::new(config)?;
        let resolver = OpenLibraryClient::new(config)?;
        let storage = Arc::new(LocalStorage::new(&config.data_dir));
        let store = BookStore::for_session(storage, session);

        Ok(Self::new(
            Arc::new(vision),
            Arc::new(resolver),
            Arc::new(store),
            notifier,
        ))
    }

    /// Subscribe to state transitions
    pub fn subscribe(&self) -> broadcast::Receiver<ScanState> {
        self.event_tx.subscribe()
    }

    /// The most recent state
    pub fn state(&self) -> ScanState {
        match self.current.lock() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether a run is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn store(&self) -> &BookStore {
        &self.store
    }

    /// Run the pipeline once for a user-initiated capture
    ///
    /// Refuses to start (and stays idle) without an active session, when the
    /// session's user does not own the store, without camera permission, or
    /// while another run is in flight. Once started,
    /// the run always ends in `Done` or `Aborted` with exactly one notification.
    pub async fn run(
        &self,
        session: &SessionContext,
        camera_permitted: bool,
        source: &dyn FrameSource,
    ) -> Result<ScanOutcome, ScanError> {
        if !session.is_active() {
            return Err(ScanError::SignedOut);
        }
        if !self.store.belongs_to(session) {
            tracing::warn!(user = %session.user_id(), key = %self.store.key(), "Scan refused for another user's book list");
            return Err(ScanError::SessionMismatch);
        }
        if !camera_permitted {
            return Err(ScanError::PermissionRequired);
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!(user = %session.user_id(), "Scan requested while another is in flight");
            return Err(ScanError::ScanInProgress);
        }
        let _guard = BusyGuard(&self.busy);

        self.transition(ScanState::Idle);
        tracing::info!(user = %session.user_id(), "Starting scan");

        let outcome = match self.pipeline(source).await {
            Ok(record) => {
                self.transition(ScanState::Done);
                self.notifier.notify(Notification::book_details(&record));
                tracing::info!(id = %record.id, isbn = %record.isbn, title = %record.title, "Scan complete");
                ScanOutcome::Done(record)
            }
            Err(reason) => {
                self.transition(ScanState::Aborted(reason));
                self.notifier.notify(Notification::aborted(reason));
                tracing::warn!(reason = %reason, "Scan aborted");
                ScanOutcome::Aborted(reason)
            }
        };

        Ok(outcome)
    }

    async fn pipeline(&self, source: &dyn FrameSource) -> Result<BookRecord, AbortReason> {
        self.transition(ScanState::Capturing);
        let frame = source.capture().await.map_err(|e| {
            tracing::warn!("Capture failed: {}", e);
            AbortReason::CaptureFailed
        })?;
        tracing::debug!(bytes = frame.len(), "Captured frame");

        self.transition(ScanState::Extracting);
        let text = self
            .vision
            .extract_text(&frame.to_base64())
            .await
            .map_err(|e| {
                tracing::warn!("Text extraction failed: {}", e);
                AbortReason::ExtractionFailed
            })?;
        drop(frame);

        self.transition(ScanState::Parsing);
        let isbn = parse_isbn(&text).ok_or_else(|| {
            tracing::debug!(text = %text, "No ISBN in extracted text");
            AbortReason::IsbnNotFound
        })?;
        tracing::debug!(isbn = %isbn, "Parsed ISBN");

        self.transition(ScanState::Resolving);
        let metadata = match self.resolver.resolve(&isbn).await {
            Ok(Some(metadata)) => metadata,
            Ok(None) => return Err(AbortReason::BookNotFound),
            Err(e) => {
                tracing::warn!(isbn = %isbn, "Metadata lookup failed: {}", e);
                return Err(AbortReason::LookupFailed);
            }
        };

        self.transition(ScanState::Persisting);
        let record = BookRecord::new(&isbn, &metadata);
        self.store.append_and_persist(record).await.map_err(|e| {
            tracing::error!(isbn = %isbn, "Failed to persist book: {}", e);
            AbortReason::PersistenceFailed
        })
    }

    fn transition(&self, state: ScanState) {
        tracing::debug!(state = ?state, "Scan state");
        match self.current.lock() {
            Ok(mut current) => *current = state.clone(),
            Err(poisoned) => *poisoned.into_inner() = state.clone(),
        }
        // No subscribers is fine
        let _ = self.event_tx.send(state);
    }
}
