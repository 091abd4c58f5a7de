//! AgentBackend trait definition.
//!
//! Uses RPITIT for both operations. `send` resolves once the backend has
//! accepted the request and yields the raw response body as a boxed byte
//! stream; framing and parsing happen in [`crate::stream`].

use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use consultant_types::error::BackendError;
use consultant_types::session::SessionInfo;
use consultant_types::wire::RunRequest;

/// Raw response body of a run request, chunked arbitrarily.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, BackendError>> + Send + 'static>>;

pub trait AgentBackend: Send + Sync {
    /// Ask the backend for a fresh session.
    fn create_session(
        &self,
    ) -> impl std::future::Future<Output = Result<SessionInfo, BackendError>> + Send;

    /// Submit one user message. An error here means the request was
    /// rejected before any body arrived.
    fn send(
        &self,
        request: RunRequest,
    ) -> impl std::future::Future<Output = Result<ByteStream, BackendError>> + Send;
}
