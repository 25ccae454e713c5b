//! An asynchronous micro HTTP/1.1 client implementation
//!
//! This crate provides a lightweight HTTP/1.1 client protocol engine built
//! on top of tokio. It speaks to a single peer endpoint per client
//! instance and focuses on getting the wire protocol right: head-boundary
//! scanning, length-versus-chunked body framing, cookie propagation across
//! requests, connection reuse and timeout-driven cancellation.
//!
//! # Features
//!
//! - HTTP/1.1 request writing and response parsing
//! - `Content-Length` and `Transfer-Encoding: chunked` body framing
//! - Unframed (upgrade) responses handed over with their open connection
//! - Connection reuse through a free-list pool, one peer per client
//! - Automatic cookie propagation across requests
//! - Timeout-driven cancellation that always discards the stalled
//!   connection
//! - Optional TLS via rustls against the bundled webpki roots
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tracing::{error, info, Level};
//! use tracing_subscriber::FmtSubscriber;
//! use micro_client::{Client, ClientRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     let client = Client::builder("example.com").build();
//!
//!     match client.send(ClientRequest::get("/"), Duration::from_secs(10)).await {
//!         Ok(response) => {
//!             info!(status = %response.status(), "received response");
//!             info!(body_len = response.body().len(), "body read to completion");
//!         }
//!         Err(e) => {
//!             error!("request failed, cause {}", e);
//!         }
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`client`]: The facade: configuration, cookie jar and pool behind
//!   a single `send` entry point
//! - [`connection`]: Connection handles, the free-list pool and the
//!   plain-or-TLS stream under them
//! - [`codec`]: Request encoding and response decoding
//! - [`protocol`]: Protocol types, framing modes and the error surface
//!
//! # Core behavior
//!
//! ## One exchange
//!
//! [`client::Client::send`] assembles the request head (client defaults,
//! cookie jar entries, per-request extras, content headers), acquires a
//! connection from the pool, writes the request and decodes the response.
//! The whole exchange runs under the caller's timeout; expiry closes the
//! in-flight connection and surfaces a timeout error.
//!
//! ## Body framing
//!
//! A recognized `Content-Length` is read exactly; otherwise a final
//! `chunked` transfer coding selects the chunked decoder; otherwise the
//! response is treated as a protocol upgrade and returned with an empty
//! body and the open connection for the caller to read directly.
//!
//! ## Connection lifecycle
//!
//! Connections are opened lazily and returned to the free list after each
//! fully read response. Reset, timeout and unframed responses all take
//! the connection out of circulation; the next request dials fresh. A
//! pooled connection that died while idle is detected on its next use and
//! the exchange retried exactly once on a new connection.
//!
//! # Limitations
//!
//! - HTTP/1.1 only (no HTTP/2 or HTTP/3)
//! - No redirect following or proxying
//! - Request bodies are byte buffers, not streams
//! - Maximum response head size: 16KB, at most 64 header fields

pub mod client;
pub mod codec;
pub mod connection;
pub mod protocol;

mod cookie;
mod utils;
pub(crate) use utils::ensure;

pub use client::{Client, ClientBuilder, ClientResponse};
pub use connection::Connection;
pub use protocol::{ClientError, ClientRequest, FramingError};
