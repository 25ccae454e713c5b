//! One checked-out connection and the exchange that runs on it.
//!
//! A [`Connection`] owns the stream and its read buffer for the duration
//! of one exchange. [`Connection::roundtrip`] writes the encoded request
//! and drives the response decoder until the body is complete or the
//! response turns out to be unframed, in which case the still-open handle
//! travels back to the caller inside the response.
//!
//! Exclusivity needs no lock: while checked out the connection is owned
//! by exactly one exchange, and a new request is never written before the
//! previous response has been fully read.

use std::cmp;
use std::io;

use bytes::{Bytes, BytesMut};
use http::Method;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::ResponseDecoder;
use crate::connection::stream::ClientStream;
use crate::protocol::{BodyItem, ClientError, ResponseFrame, ResponseHead};

/// Initial read buffer capacity per connection
const READ_BUF_SIZE: usize = 8 * 1024;

/// The result of one complete request/response cycle.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// The response was fully framed and its body fully read.
    Complete { head: ResponseHead, body: Bytes },
    /// The response carried no recognized framing; the stream stays open
    /// for the caller to read directly.
    Unframed { head: ResponseHead },
}

/// How far an exchange got before it failed.
///
/// Distinguishing the two is what makes the stale-pooled-connection retry
/// safe: an `Unanswered` failure on a reused connection can be replayed
/// on a fresh one, an `Interrupted` one never can.
#[derive(Debug)]
pub(crate) enum RoundtripError {
    /// The exchange failed before any response byte arrived.
    Unanswered(ClientError),
    /// The response started flowing and then failed.
    Interrupted(ClientError),
}

impl RoundtripError {
    pub(crate) fn into_inner(self) -> ClientError {
        match self {
            Self::Unanswered(error) | Self::Interrupted(error) => error,
        }
    }
}

/// A duplex byte-stream handle to the configured peer.
///
/// Returned to callers only for unframed (upgrade) responses, where the
/// engine stops reading and the caller takes over the stream.
#[derive(Debug)]
pub struct Connection {
    stream: ClientStream,
    buffer: BytesMut,
    reused: bool,
}

impl Connection {
    pub(crate) fn new(stream: ClientStream) -> Self {
        Self { stream, buffer: BytesMut::with_capacity(READ_BUF_SIZE), reused: false }
    }

    pub(crate) fn mark_reused(&mut self) {
        self.reused = true;
    }

    /// Returns true if this connection already served an earlier exchange.
    pub(crate) fn is_reused(&self) -> bool {
        self.reused
    }

    /// Returns true if undecoded bytes are still sitting in the read
    /// buffer. A healthy connection is at a message boundary with an
    /// empty buffer between exchanges.
    pub(crate) fn has_buffered(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Runs one exchange: writes the request bytes, then reads and
    /// decodes the response to completion.
    pub(crate) async fn roundtrip(&mut self, request: &[u8], method: &Method) -> Result<Outcome, RoundtripError> {
        let mut answered = self.has_buffered();

        let write_result: io::Result<()> = async {
            self.stream.write_all(request).await?;
            self.stream.flush().await
        }
        .await;

        if let Err(source) = write_result {
            debug!(cause = %source, reused = self.reused, "request write failed");
            return Err(wrap(ClientError::Connection { source }, answered));
        }

        trace!(len = request.len(), "wrote request");

        let mut decoder = ResponseDecoder::for_method(method);
        let mut head: Option<ResponseHead> = None;
        let mut body = BytesMut::new();

        loop {
            loop {
                let frame = match decoder.decode(&mut self.buffer) {
                    Ok(Some(frame)) => frame,
                    Ok(None) => break,
                    Err(e) => return Err(wrap(e.into_client_error(), answered)),
                };

                match frame {
                    ResponseFrame::Head(h, framing) if framing.is_unframed() => {
                        debug!(status = %h.status(), "unframed response, handing stream to caller");
                        return Ok(Outcome::Unframed { head: h });
                    }
                    ResponseFrame::Head(h, framing) => {
                        trace!(status = %h.status(), ?framing, "read response head");
                        head = Some(h);
                    }
                    ResponseFrame::Body(BodyItem::Data(bytes)) => {
                        body.extend_from_slice(&bytes);
                    }
                    ResponseFrame::Body(BodyItem::End) => {
                        let head = head
                            .take()
                            .ok_or_else(|| RoundtripError::Interrupted(ClientError::closed("body without head")))?;
                        return Ok(Outcome::Complete { head, body: body.freeze() });
                    }
                }
            }

            let read = self
                .stream
                .read_buf(&mut self.buffer)
                .await
                .map_err(|source| wrap(ClientError::Connection { source }, answered))?;

            if read == 0 {
                debug!(answered, "peer closed connection mid-exchange");
                return Err(wrap(ClientError::closed("connection closed before response completed"), answered));
            }

            answered = true;
        }
    }

    /// Reads bytes from the stream, serving any bytes already buffered
    /// ahead of the stream itself. Used after an unframed response to
    /// continue consuming whatever the peer sends.
    pub async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.buffer.is_empty() {
            let take = cmp::min(buf.len(), self.buffer.len());
            buf[..take].copy_from_slice(&self.buffer.split_to(take));
            return Ok(take);
        }

        self.stream.read(buf).await
    }

    /// Writes bytes straight to the stream.
    pub async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.stream.write_all(buf).await?;
        self.stream.flush().await
    }

    /// Shuts the write side down, signalling the peer that no more data
    /// is coming.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

fn wrap(error: ClientError, answered: bool) -> RoundtripError {
    if answered {
        RoundtripError::Interrupted(error)
    } else {
        RoundtripError::Unanswered(error)
    }
}
