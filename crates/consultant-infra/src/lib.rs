//! Infrastructure layer for the Consultant chat client.
//!
//! Contains the reqwest implementation of the `AgentBackend` port defined in
//! `consultant-core`, the document upload client, and the `config.toml`
//! loader.

pub mod config;
pub mod http;
