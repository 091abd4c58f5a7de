//! Backend session identity.

use serde::{Deserialize, Serialize};

/// Identifiers required to address the agent backend.
///
/// Returned by the backend's session endpoint and replaced wholesale when
/// the user starts a new conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub user_id: String,
    pub app_name: String,
}

impl SessionInfo {
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            app_name: app_name.into(),
        }
    }

    /// Shortened session id for display (first 8 characters).
    pub fn short_id(&self) -> &str {
        match self.session_id.char_indices().nth(8) {
            Some((idx, _)) => &self.session_id[..idx],
            None => &self.session_id,
        }
    }
}
