use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced to callers of the client.
///
/// Callers match on the variant to tell a dead peer from a stalled one
/// from a peer speaking the protocol wrong. An upgrade response is not an
/// error; it is returned as a normal response with its connection handle.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection error: {source}")]
    Connection {
        #[from]
        source: io::Error,
    },

    #[error("exchange timed out after {limit:?}")]
    Timeout { limit: Duration },

    #[error("framing error: {source}")]
    Framing {
        #[from]
        source: FramingError,
    },
}

impl ClientError {
    /// Returns true if this is a connection-level failure.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns true if the exchange ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true if the peer's bytes could not be parsed as HTTP/1.1.
    pub fn is_framing(&self) -> bool {
        matches!(self, Self::Framing { .. })
    }

    pub(crate) fn closed(reason: &str) -> Self {
        Self::Connection { source: io::Error::new(io::ErrorKind::UnexpectedEof, reason.to_owned()) }
    }
}

/// Errors raised while parsing a response off the wire.
///
/// Every variant means the connection can no longer be trusted to be at a
/// message boundary; the exchange discards it rather than pooling it.
#[derive(Error, Debug)]
pub enum FramingError {
    #[error("header block too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid status line: {reason}")]
    InvalidStatusLine { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("invalid chunk size line: {reason}")]
    InvalidChunkSize { reason: String },

    #[error("chunk data not terminated by CRLF")]
    InvalidChunkTerminator,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl FramingError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_status_line<S: ToString>(str: S) -> Self {
        Self::InvalidStatusLine { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn invalid_chunk_size<S: ToString>(str: S) -> Self {
        Self::InvalidChunkSize { reason: str.to_string() }
    }

    /// Folds the error into a [`ClientError`], keeping io failures in the
    /// connection class so callers can match on what actually went wrong.
    pub(crate) fn into_client_error(self) -> ClientError {
        match self {
            Self::Io { source } => ClientError::Connection { source },
            other => ClientError::Framing { source: other },
        }
    }
}
