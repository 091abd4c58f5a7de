//! HTTP adapters for the agent backend.
//!
//! [`client::HttpAgentBackend`] speaks the session and streaming run
//! endpoints; [`upload::UploadClient`] posts documents to the upload
//! endpoint. Both share [`build_client`] and [`error_for_status`].

pub mod client;
pub mod upload;

use std::time::Duration;

use consultant_types::config::ClientConfig;
use consultant_types::error::BackendError;

pub use client::HttpAgentBackend;
pub use upload::UploadClient;

/// Shared HTTP client handle; cheap to clone.
pub use reqwest::Client as HttpClient;

/// Build the shared reqwest client. Only connection setup is bounded; a
/// streaming body may stay open indefinitely.
pub fn build_client(config: &ClientConfig) -> Result<HttpClient, BackendError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()
        .map_err(|e| BackendError::Transport(format!("failed to create HTTP client: {e}")))
}

/// Pass successful responses through; turn anything else into an error
/// carrying the status and body.
pub(crate) async fn error_for_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, body = %body, "backend error response");
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

pub(crate) fn transport_error(e: reqwest::Error) -> BackendError {
    BackendError::Transport(e.to_string())
}
