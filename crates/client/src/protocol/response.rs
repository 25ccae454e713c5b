//! HTTP response head handling implementation.
//!
//! This module wraps the standard `http::Response` type to give the rest of
//! the engine a parse-once, query-many view of a response's status line and
//! header block. The header block is converted into a multimap in a single
//! linear pass at decode time; every later lookup is a map query against
//! that multimap rather than a rescan of the raw bytes.

use http::header::{CONNECTION, SET_COOKIE};
use http::response::Parts;
use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode, Version};

/// The parsed status line and header block of an HTTP response.
///
/// This struct wraps a `http::Response<()>` to provide:
/// - Access to status, version and the header multimap
/// - Multi-valued header lookup in block order
/// - Connection-disposition inspection
#[derive(Debug)]
pub struct ResponseHead {
    inner: Response<()>,
}

impl AsRef<Response<()>> for ResponseHead {
    fn as_ref(&self) -> &Response<()> {
        &self.inner
    }
}

impl ResponseHead {
    /// Consumes the head and returns the inner `Response<()>`.
    pub fn into_inner(self) -> Response<()> {
        self.inner
    }

    /// Attaches a body to this head, converting it into a full `Response<T>`.
    pub fn body<T>(self, body: T) -> Response<T> {
        self.inner.map(|_| body)
    }

    /// Returns the response status code.
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Returns the response HTTP version.
    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// Returns a reference to the response's headers.
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Returns every value of the named header, in block order.
    ///
    /// Absent headers yield an empty iterator, not an error. Name matching
    /// is case-insensitive, so any casing a peer chooses on the wire is
    /// found by the same lookup.
    pub fn header_values(&self, name: HeaderName) -> impl Iterator<Item = &HeaderValue> {
        self.inner.headers().get_all(name).iter()
    }

    /// Returns every `Set-Cookie` value carried by this response.
    pub fn set_cookies(&self) -> impl Iterator<Item = &HeaderValue> {
        self.header_values(SET_COOKIE)
    }

    /// Returns true if the peer asked for this connection to be closed
    /// after the exchange.
    pub fn wants_close(&self) -> bool {
        self.inner
            .headers()
            .get(CONNECTION)
            .is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"close"))
    }
}

/// Converts response parts into a ResponseHead.
impl From<Parts> for ResponseHead {
    #[inline]
    fn from(parts: Parts) -> Self {
        Self { inner: Response::from_parts(parts, ()) }
    }
}

/// Converts a bodyless response into a ResponseHead.
impl From<Response<()>> for ResponseHead {
    #[inline]
    fn from(inner: Response<()>) -> Self {
        Self { inner }
    }
}
