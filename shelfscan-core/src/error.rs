//! Error types for Shelfscan Core

use thiserror::Error;

/// Result type alias using ShelfscanError
pub type Result<T> = std::result::Result<T, ShelfscanError>;

/// Top-level error type for all Shelfscan operations
#[derive(Debug, Error)]
pub enum ShelfscanError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scan refused: {0}")]
    Scan(#[from] ScanError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the remote vision service call
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Vision API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response carried no completion text")]
    MissingText,

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Errors raised by the bibliographic lookup call
///
/// A missing entry is not an error; the resolver reports it as `None`.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Lookup API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Errors raised while writing the book list back to storage
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize book list: {0}")]
    Serialize(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors raised by a frame source
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No frame available: {0}")]
    Unavailable(String),

    #[error("Empty frame")]
    Empty,
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Configuration problems detected while building clients
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing API key (set OPEN_AI_KEY)")]
    MissingApiKey,

    #[error("Unknown vision API variant: {0}")]
    UnknownVisionApi(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Reasons a scan refuses to leave the idle state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("camera permission has not been granted")]
    PermissionRequired,

    #[error("a scan is already in progress")]
    ScanInProgress,

    #[error("no signed-in session")]
    SignedOut,

    #[error("session user does not own this book list")]
    SessionMismatch,
}
