//! The client facade: configuration, cookie jar and connection pool in
//! one place, exposing a single `send` entry point.
//!
//! A [`Client`] is bound to exactly one peer (host, port, secure) for its
//! whole life. Configuration is immutable after [`ClientBuilder::build`];
//! the only mutable state a client carries is its cookie jar and the pool
//! free list, each behind a short lock that is never held across I/O.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use micro_client::{Client, ClientRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Client::builder("example.com").build();
//!
//!     match client.send(ClientRequest::get("/status"), Duration::from_secs(5)).await {
//!         Ok(response) => {
//!             println!("{} {:?}", response.status(), response.body());
//!         }
//!         Err(e) => {
//!             eprintln!("request failed: {e}");
//!         }
//!     }
//! }
//! ```

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use http::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, HOST, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Version};
use tokio::time;
use tokio_util::codec::Encoder;
use tracing::{debug, warn};

use crate::codec::RequestEncoder;
use crate::connection::{Connection, ConnectionPool, Outcome, RoundtripError, Transport};
use crate::cookie::CookieJar;
use crate::protocol::{ClientError, ClientRequest, RequestHead, ResponseHead};

const USER_AGENT_VALUE: &str = concat!("micro-client/", env!("CARGO_PKG_VERSION"));

/// An HTTP/1.1 client bound to a single peer endpoint.
///
/// Connections are opened lazily, pooled after successful exchanges and
/// recycled until an error or timeout destroys one. Cookies set by the
/// peer are replayed on every subsequent request automatically.
#[derive(Debug)]
pub struct Client {
    default_headers: Vec<(HeaderName, HeaderValue)>,
    jar: Mutex<CookieJar>,
    pool: ConnectionPool,
}

impl Client {
    /// Starts building a client for the given host.
    pub fn builder(host: impl Into<String>) -> ClientBuilder {
        ClientBuilder { host: host.into(), port: None, secure: None, headers: Vec::new() }
    }

    /// Returns the configured peer host.
    pub fn host(&self) -> &str {
        self.pool.transport().host()
    }

    /// Returns the configured peer port.
    pub fn port(&self) -> u16 {
        self.pool.transport().port()
    }

    /// Number of idle connections currently held for reuse.
    pub fn idle_connections(&self) -> usize {
        self.pool.idle_len()
    }

    /// Performs one exchange: writes the request, reads the response.
    ///
    /// The whole exchange runs under `limit`; if it has not completed by
    /// then the in-flight connection is closed and
    /// [`ClientError::Timeout`] returned. A pooled connection that turns
    /// out to be dead before the response starts is replaced and the
    /// request rewritten exactly once; any later failure surfaces as is.
    pub async fn send(&self, request: ClientRequest, limit: Duration) -> Result<ClientResponse, ClientError> {
        let head = self.assemble_head(&request);

        let mut wire = BytesMut::new();
        RequestEncoder.encode((head, request.body_bytes().cloned()), &mut wire)?;
        let wire = wire.freeze();

        debug!(method = %request.method(), target = request.target(), "sending request");

        match time::timeout(limit, self.exchange(&wire, request.method())).await {
            Ok(result) => result,
            Err(_) => {
                debug!(?limit, "exchange timed out, in-flight connection discarded");
                Err(ClientError::Timeout { limit })
            }
        }
    }

    async fn exchange(&self, wire: &Bytes, method: &Method) -> Result<ClientResponse, ClientError> {
        let mut conn = self.pool.acquire().await?;

        let outcome = match conn.roundtrip(wire, method).await {
            Ok(outcome) => outcome,
            Err(RoundtripError::Unanswered(cause)) if conn.is_reused() => {
                debug!(%cause, "pooled connection went stale, retrying once on a fresh one");
                drop(conn);
                conn = self.pool.dial().await?;
                conn.roundtrip(wire, method).await.map_err(RoundtripError::into_inner)?
            }
            Err(other) => return Err(other.into_inner()),
        };

        match outcome {
            Outcome::Complete { head, body } => {
                self.store_cookies(&head);

                if head.wants_close() {
                    debug!("peer asked to close, discarding connection");
                } else {
                    self.pool.release(conn);
                }

                Ok(ClientResponse { head, body, upgrade: None })
            }
            Outcome::Unframed { head } => {
                self.store_cookies(&head);
                Ok(ClientResponse { head, body: Bytes::new(), upgrade: Some(conn) })
            }
        }
    }

    /// Builds the wire head for a request: default lines, then one
    /// `Cookie` line per jar entry, then the request's extras, then the
    /// content headers a body implies, unless the caller already
    /// supplied their own.
    fn assemble_head(&self, request: &ClientRequest) -> RequestHead {
        let mut lines = self.default_headers.clone();

        {
            let jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
            for value in jar.render() {
                lines.push((COOKIE, value));
            }
        }

        lines.extend_from_slice(request.extra_headers());

        if let Some(body) = request.body_bytes() {
            if !request.has_header(&CONTENT_TYPE) {
                lines.push((CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded")));
            }
            if !request.has_header(&CONTENT_LENGTH) {
                lines.push((CONTENT_LENGTH, HeaderValue::from(body.len())));
            }
        }

        RequestHead::new(request.method().clone(), request.target().to_owned(), lines)
    }

    fn store_cookies(&self, head: &ResponseHead) {
        let mut jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        for value in head.set_cookies() {
            jar.apply(value);
        }
    }
}

/// Builder for [`Client`].
///
/// Port and security resolve from each other: port 443 implies a secure
/// client, a secure client defaults to port 443, everything else defaults
/// to port 80.
#[derive(Debug)]
pub struct ClientBuilder {
    host: String,
    port: Option<u16>,
    secure: Option<bool>,
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl ClientBuilder {
    /// Overrides the peer port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Forces TLS on or off regardless of the port.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Appends a default header line sent with every request.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> Client {
        let secure = self.secure.unwrap_or(self.port == Some(443));
        let port = self.port.unwrap_or(if secure { 443 } else { 80 });

        let mut lines = Vec::with_capacity(3 + self.headers.len());

        let default_port = if secure { 443 } else { 80 };
        let host_value = if port == default_port { self.host.clone() } else { format!("{}:{port}", self.host) };
        match HeaderValue::from_str(&host_value) {
            Ok(value) => lines.push((HOST, value)),
            Err(_) => warn!(host = %self.host, "host not representable as a header value"),
        }
        lines.push((USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE)));
        lines.push((ACCEPT, HeaderValue::from_static("*/*")));
        lines.extend(self.headers);

        Client {
            default_headers: lines,
            jar: Mutex::new(CookieJar::new()),
            pool: ConnectionPool::new(Transport::new(self.host, port, secure)),
        }
    }
}

/// A fully parsed HTTP response.
///
/// For unframed (upgrade) responses the body is empty and the still-open
/// connection is carried inside; [`ClientResponse::into_upgrade`] hands it
/// over for direct reading.
#[derive(Debug)]
pub struct ClientResponse {
    head: ResponseHead,
    body: Bytes,
    upgrade: Option<Connection>,
}

impl ClientResponse {
    /// Returns the response status code.
    pub fn status(&self) -> StatusCode {
        self.head.status()
    }

    /// Returns the response HTTP version.
    pub fn version(&self) -> Version {
        self.head.version()
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &HeaderMap {
        self.head.headers()
    }

    /// Returns every value of the named header, in block order.
    pub fn header_values(&self, name: HeaderName) -> impl Iterator<Item = &HeaderValue> {
        self.head.header_values(name)
    }

    /// Returns the parsed head.
    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    /// Returns the decoded body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consumes the response, returning the decoded body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Returns true if this response carried no recognized framing and
    /// kept its connection open.
    pub fn is_upgrade(&self) -> bool {
        self.upgrade.is_some()
    }

    /// Consumes the response, returning the open connection of an
    /// unframed response, if any.
    pub fn into_upgrade(self) -> Option<Connection> {
        self.upgrade
    }

    /// Consumes the response into its head, body and optional connection.
    pub fn into_parts(self) -> (ResponseHead, Bytes, Option<Connection>) {
        (self.head, self.body, self.upgrade)
    }
}
