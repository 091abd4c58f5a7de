//! Port to the remote agent backend.
//!
//! Implementations live in consultant-infra (`HttpAgentBackend`); tests use
//! in-memory scripted backends.

pub mod agent;

pub use agent::{AgentBackend, ByteStream};
