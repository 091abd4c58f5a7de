//! Shared domain types for the Consultant chat client.
//!
//! This crate contains the types shared by every layer: the backend session
//! identity, conversation messages, the agent wire format, upload results,
//! client configuration, and the associated error enums.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod session;
pub mod upload;
pub mod wire;
