//! HTTP codec module for encoding requests and decoding responses
//!
//! This module provides the wire-format half of the engine: serializing
//! assembled requests and streaming responses back out of a byte buffer.
//! Decoding uses a state machine that parses the head first and then the
//! body under whichever framing mode the head declared.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestEncoder`]: serializes request line, header lines and body
//!
//! - Response handling:
//!   - [`ResponseDecoder`]: decodes head then body
//!   - Head parsing via the [`header`] module
//!   - Body decoding via the [`body`] module
//!
//! # Features
//!
//! - Streaming decode: partial input yields "need more" rather than errors
//! - Chunked transfer decoding with trailer skipping
//! - Content-Length based body framing
//! - Unframed responses surfaced for caller-driven reads

pub mod body;
pub mod header;
mod request_encoder;
mod response_decoder;

pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;
