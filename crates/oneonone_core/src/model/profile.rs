//! User profile projection used for display labels.

use crate::model::meeting::UserId;
use serde::{Deserialize, Serialize};

/// Label shown when a profile cannot be resolved.
pub const UNKNOWN_USER_LABEL: &str = "Unknown user";

/// Read-only account profile as returned by the account service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl UserProfile {
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Display label; blank usernames fall back to the placeholder.
    pub fn display_label(&self) -> &str {
        let trimmed = self.username.trim();
        if trimmed.is_empty() {
            UNKNOWN_USER_LABEL
        } else {
            trimmed
        }
    }
}
