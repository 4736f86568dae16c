//! Signed-in session handed to the dashboard and the scan pipeline

use serde::{Deserialize, Serialize};

/// An identity-provider session, passed explicitly rather than read from ambient state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    user_id: String,
    email: Option<String>,
    active: bool,
}

impl SessionContext {
    /// Create an active session for the given user
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            active: true,
        }
    }

    /// Attach the user's primary email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Whether a session is currently active
    pub fn is_active(&self) -> bool {
        self.active && !self.user_id.is_empty()
    }

    /// End the session
    pub fn sign_out(self) -> Self {
        Self {
            active: false,
            ..self
        }
    }

    /// Name shown in the dashboard greeting
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.user_id)
    }

    /// Storage key segment for this user
    ///
    /// `[A-Za-z0-9-]` pass through; every other byte, `_` included, becomes
    /// `_XX` (uppercase hex), so distinct user ids never share a key.
    pub fn storage_key(&self) -> String {
        if self.user_id.is_empty() {
            return "_".to_string();
        }
        let mut key = String::with_capacity(self.user_id.len());
        for b in self.user_id.bytes() {
            if b.is_ascii_alphanumeric() || b == b'-' {
                key.push(b as char);
            } else {
                key.push_str(&format!("_{:02X}", b));
            }
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_in_session_is_active() {
        let session = SessionContext::signed_in("user_2abc").with_email("reader@example.com");
        assert!(session.is_active());
        assert_eq!(session.display_name(), "reader@example.com");
    }

    #[test]
    fn test_sign_out() {
        let session = SessionContext::signed_in("user_2abc").sign_out();
        assert!(!session.is_active());
        assert_eq!(session.user_id(), "user_2abc");
    }

    #[test]
    fn test_empty_user_is_not_active() {
        assert!(!SessionContext::signed_in("").is_active());
    }

    #[test]
    fn test_storage_key_is_sanitized() {
        let session = SessionContext::signed_in("../alice@example.com");
        assert_eq!(session.storage_key(), "_2E_2E_2Falice_40example_2Ecom");
        assert_eq!(SessionContext::signed_in("user-2x").storage_key(), "user-2x");
        assert_eq!(SessionContext::signed_in("user_2").storage_key(), "user_5F2");
    }

    #[test]
    fn test_storage_keys_are_distinct_per_user() {
        let ids = ["alice.smith", "alice_smith", "alice_2Esmith", "alice-smith", "alicé"];
        let keys: std::collections::HashSet<String> = ids
            .iter()
            .map(|id| SessionContext::signed_in(*id).storage_key())
            .collect();
        assert_eq!(keys.len(), ids.len());
    }
}
