//! Streaming core of the Consultant chat client.
//!
//! Raw response bytes flow through [`stream::decoder`] (line framing),
//! [`stream::parser`] (event extraction) and [`chat::assembler`] (message
//! folding) into the [`chat::log::ConversationLog`]. The
//! [`chat::driver::ChatDriver`] runs one turn at a time against any
//! [`backend::AgentBackend`] and publishes every state change on the
//! [`event::bus::EventBus`].
//!
//! This crate depends only on `consultant-types` -- never on
//! `consultant-infra` or any HTTP crate.

pub mod backend;
pub mod chat;
pub mod event;
pub mod stream;
