//! User-facing notifications: one per scan attempt

use super::state::AbortReason;
use crate::types::BookRecord;
use std::sync::Mutex;

/// A modal-style message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    /// Success notice listing the stored book
    pub fn book_details(record: &BookRecord) -> Self {
        Self {
            title: "Book Details".to_string(),
            message: format!(
                "Title: {}\nAuthor: {}\nNumber of pages: {}",
                record.title, record.author, record.number_of_pages
            ),
        }
    }

    /// Failure notice for an aborted run
    pub fn aborted(reason: AbortReason) -> Self {
        Self {
            title: "Error".to_string(),
            message: reason.user_message().to_string(),
        }
    }
}

/// Receives the outcome notification of each run
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Keeps every notification it receives
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first
    pub fn received(&self) -> Vec<Notification> {
        match self.received.lock() {
            Ok(received) => received.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        match self.received.lock() {
            Ok(mut received) => received.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
