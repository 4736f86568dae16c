//! Shelfscan Core Library
//!
//! Turns a photo of a book into a stored record: the image goes to a vision
//! model for text extraction, an ISBN is parsed out of that text, the ISBN is
//! resolved against a bibliographic lookup service, and the result is
//! appended to the signed-in user's book list.

pub mod capture;
pub mod config;
pub mod error;
pub mod isbn;
pub mod lookup;
pub mod scan;
pub mod session;
pub mod storage;
pub mod store;
pub mod types;
pub mod vision;

pub use capture::{CapturedFrame, FrameSource, ImageFileSource};
pub use config::{ScanConfig, VisionApi};
pub use error::{
    CaptureError, ConfigError, ExtractionError, PersistenceError, ResolutionError, Result,
    ScanError, ShelfscanError, StorageError,
};
pub use isbn::{parse_isbn, Isbn};
pub use lookup::{MetadataResolver, OpenLibraryClient};
pub use scan::{AbortReason, Notification, Notifier, ScanOrchestrator, ScanOutcome, ScanState};
pub use session::SessionContext;
pub use store::BookStore;
pub use types::{BookMetadata, BookRecord};
pub use vision::{OpenAiVisionClient, VisionExtractor};
