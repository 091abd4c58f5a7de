//! Client configuration types.
//!
//! `ClientConfig` represents the `config.toml` that tells the client where
//! the agent backend lives and which endpoints to call.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the chat client.
///
/// Loaded from `~/.consultant/config.toml`. All fields have defaults that
/// match a backend running locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the agent backend, without a trailing slash.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Path of the session creation endpoint.
    #[serde(default = "default_session_path")]
    pub session_path: String,

    /// Path of the streaming run endpoint.
    #[serde(default = "default_run_path")]
    pub run_path: String,

    /// Path of the document upload endpoint.
    #[serde(default = "default_upload_path")]
    pub upload_path: String,

    /// Connection setup timeout. Streams themselves are never timed out.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_session_path() -> String {
    "/chat/session".to_string()
}

fn default_run_path() -> String {
    "/run_sse".to_string()
}

fn default_upload_path() -> String {
    "/upload/".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            session_path: default_session_path(),
            run_path: default_run_path(),
            upload_path: default_upload_path(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Join the backend URL with an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.backend_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    pub fn session_url(&self) -> String {
        self.endpoint(&self.session_path)
    }

    pub fn run_url(&self) -> String {
        self.endpoint(&self.run_path)
    }

    pub fn upload_url(&self) -> String {
        self.endpoint(&self.upload_path)
    }
}
