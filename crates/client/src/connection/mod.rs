//! Connection handling for the client engine.
//!
//! This module owns everything between the codec and the socket:
//!
//! - [`Connection`]: one checked-out duplex stream plus its read buffer;
//!   runs a single exchange at a time and is handed to callers whole when
//!   a response has no recognized framing
//! - `ConnectionPool`: the free list of idle connections to the peer
//! - `ClientStream` / `Transport`: plain-or-TLS streams and the dialing
//!   configuration that opens them
//!
//! # Features
//!
//! - Lazy connection establishment, reuse until error or timeout
//! - Stale-reuse detection: a pooled connection that fails before its
//!   first response byte is replaced and the exchange retried once
//! - Buffered-leftover guard: desynced connections never re-enter the pool

mod conn;
mod pool;
mod stream;

pub use conn::Connection;

pub(crate) use conn::{Outcome, RoundtripError};
pub(crate) use pool::ConnectionPool;
pub(crate) use stream::Transport;
