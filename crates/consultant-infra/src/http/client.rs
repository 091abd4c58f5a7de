//! HttpAgentBackend -- concrete [`AgentBackend`] over HTTP.
//!
//! `POST {session_path}` hands out a session, `POST {run_path}` submits one
//! user message and answers with a `data: `-framed event stream. The body is
//! passed through untouched as a [`ByteStream`]; framing happens in the core.

use futures_util::StreamExt;

use consultant_core::backend::{AgentBackend, ByteStream};
use consultant_types::config::ClientConfig;
use consultant_types::error::BackendError;
use consultant_types::session::SessionInfo;
use consultant_types::wire::RunRequest;

use super::{build_client, error_for_status, transport_error};

pub struct HttpAgentBackend {
    client: reqwest::Client,
    session_url: String,
    run_url: String,
}

impl HttpAgentBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        Ok(Self::with_client(build_client(config)?, config))
    }

    /// Reuse an existing client (shared with the upload client).
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            session_url: config.session_url(),
            run_url: config.run_url(),
        }
    }

    /// Fetch the backend's stored state for a session.
    ///
    /// The body is returned as raw JSON; its shape belongs to the backend.
    pub async fn get_session(&self, session_id: &str) -> Result<serde_json::Value, BackendError> {
        let url = format!("{}/{}", self.session_url.trim_end_matches('/'), session_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound);
        }
        let response = error_for_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| BackendError::Decode(format!("session body: {e}")))
    }
}

impl AgentBackend for HttpAgentBackend {
    async fn create_session(&self) -> Result<SessionInfo, BackendError> {
        let response = self
            .client
            .post(&self.session_url)
            .send()
            .await
            .map_err(transport_error)?;
        let response = error_for_status(response).await?;

        let session: SessionInfo = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(format!("session body: {e}")))?;
        tracing::debug!(session_id = %session.session_id, app = %session.app_name, "session issued");
        Ok(session)
    }

    async fn send(&self, request: RunRequest) -> Result<ByteStream, BackendError> {
        let response = self
            .client
            .post(&self.run_url)
            .header("accept", "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        let response = error_for_status(response).await?;

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| BackendError::Stream(format!("response body read: {e}"))));
        Ok(Box::pin(body))
    }
}
