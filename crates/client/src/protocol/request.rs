//! Outgoing request types.
//!
//! A [`ClientRequest`] is what callers hand to the client for one exchange:
//! method, request target (path plus query), optional extra header lines
//! and an optional body. It is constructed per call and not retained.
//!
//! A [`RequestHead`] is the fully assembled wire head the client builds
//! from its defaults, the cookie jar and the request's extras. Header
//! lines are kept as an insertion-ordered list because the order they are
//! written in is part of the produced wire format.

use bytes::Bytes;
use http::{HeaderName, HeaderValue, Method};

/// One pending HTTP request.
#[derive(Debug)]
pub struct ClientRequest {
    method: Method,
    target: String,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Option<Bytes>,
}

impl ClientRequest {
    /// Creates a request with the given method and request target.
    ///
    /// The target is written to the wire as-is and should be an
    /// origin-form path with optional query, e.g. `/search?q=rust`.
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self { method, target: target.into(), headers: Vec::new(), body: None }
    }

    /// Creates a GET request for the given target.
    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::GET, target)
    }

    /// Creates a POST request for the given target.
    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::POST, target)
    }

    /// Creates a PUT request for the given target.
    pub fn put(target: impl Into<String>) -> Self {
        Self::new(Method::PUT, target)
    }

    /// Creates a DELETE request for the given target.
    pub fn delete(target: impl Into<String>) -> Self {
        Self::new(Method::DELETE, target)
    }

    /// Appends an extra header line to this request.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Attaches a body to this request.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns the request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the extra header lines, in insertion order.
    pub fn extra_headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    /// Returns the request body, if any.
    pub fn body_bytes(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns true if the caller supplied the named header themselves.
    pub fn has_header(&self, name: &HeaderName) -> bool {
        self.headers.iter().any(|(n, _)| n == name)
    }
}

/// The assembled wire head of one outgoing request.
///
/// Built by the client from its default header lines, the cookie jar and
/// the request's extras; consumed by the request encoder.
#[derive(Debug)]
pub struct RequestHead {
    method: Method,
    target: String,
    lines: Vec<(HeaderName, HeaderValue)>,
}

impl RequestHead {
    pub(crate) fn new(method: Method, target: String, lines: Vec<(HeaderName, HeaderValue)>) -> Self {
        Self { method, target, lines }
    }

    /// Returns the request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the header lines in the order they will be written.
    pub fn lines(&self) -> &[(HeaderName, HeaderValue)] {
        &self.lines
    }
}
