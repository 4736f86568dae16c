//! Pipeline states and terminal outcomes

use crate::types::BookRecord;
use std::fmt;

/// One stage of a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Capturing,
    Extracting,
    Parsing,
    Resolving,
    Persisting,
    Done,
    Aborted(AbortReason),
}

impl ScanState {
    /// Whether the run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanState::Done | ScanState::Aborted(_))
    }

    /// Short progress label for display
    pub fn label(&self) -> &'static str {
        match self {
            ScanState::Idle => "Ready",
            ScanState::Capturing => "Capturing photo...",
            ScanState::Extracting => "Reading image...",
            ScanState::Parsing => "Looking for an ISBN...",
            ScanState::Resolving => "Looking up book details...",
            ScanState::Persisting => "Saving book...",
            ScanState::Done => "Done",
            ScanState::Aborted(_) => "Aborted",
        }
    }
}

/// Why a run stopped before persisting a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    CaptureFailed,
    ExtractionFailed,
    IsbnNotFound,
    BookNotFound,
    LookupFailed,
    PersistenceFailed,
}

impl AbortReason {
    /// Message shown to the user in the single failure notification
    pub fn user_message(&self) -> &'static str {
        match self {
            AbortReason::CaptureFailed => "Could not take a photo.",
            AbortReason::ExtractionFailed => "No result from the vision service.",
            AbortReason::IsbnNotFound => "ISBN not found in the image.",
            AbortReason::BookNotFound => "Book details not found.",
            AbortReason::LookupFailed => "An error occurred while looking up the book.",
            AbortReason::PersistenceFailed => "The book could not be saved.",
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            AbortReason::CaptureFailed => "capture failed",
            AbortReason::ExtractionFailed => "extraction failed",
            AbortReason::IsbnNotFound => "isbn not found",
            AbortReason::BookNotFound => "book not found",
            AbortReason::LookupFailed => "lookup failed",
            AbortReason::PersistenceFailed => "persistence failed",
        };
        f.write_str(reason)
    }
}

/// Result of a run that left the idle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The record as stored
    Done(BookRecord),
    Aborted(AbortReason),
}

impl ScanOutcome {
    pub fn record(&self) -> Option<&BookRecord> {
        match self {
            ScanOutcome::Done(record) => Some(record),
            ScanOutcome::Aborted(_) => None,
        }
    }

    pub fn abort_reason(&self) -> Option<AbortReason> {
        match self {
            ScanOutcome::Done(_) => None,
            ScanOutcome::Aborted(reason) => Some(*reason),
        }
    }
}
