//! Byte stream to fragment pipeline.
//!
//! [`decoder::StreamFrameDecoder`] turns byte chunks into complete lines;
//! [`parser::EventParser`] turns each line into zero or more text fragments.

pub mod decoder;
pub mod parser;
