//! Decoder implementation for HTTP chunked transfer encoding.
//!
//! This module decodes response bodies sent with chunked transfer encoding
//! as specified in [RFC 7230 Section 4.1](https://tools.ietf.org/html/rfc7230#section-4.1):
//! a sequence of size-prefixed data segments terminated by a zero-size
//! segment and a trailing empty line.
//!
//! The decoder works a line at a time: it scans the buffer for the next
//! CRLF, parses the hexadecimal chunk size before any `;` extension, and
//! then requires the full chunk data plus its CRLF terminator before
//! emitting the data. Any malformed size field or missing terminator is a
//! framing error, after which the connection must not be reused.

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{BodyItem, FramingError};

/// A chunk size line (hex digits plus optional extension) longer than this
/// is rejected rather than buffered further.
const MAX_SIZE_LINE_BYTES: usize = 4 * 1024;

/// A decoder for HTTP chunked transfer encoding.
///
/// Emits [`BodyItem::Data`] once per decoded chunk and [`BodyItem::End`]
/// after the terminal zero-size chunk. Trailer fields between the terminal
/// chunk and the final empty line are read and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: ChunkedState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    /// Expecting a chunk size line.
    SizeLine,
    /// Expecting `size` data bytes followed by CRLF.
    Data { size: usize },
    /// Expecting trailer fields or the final empty line.
    Trailer,
    /// The terminal chunk and its trailing empty line have been consumed.
    End,
}

impl ChunkedDecoder {
    /// Creates a decoder positioned before the first chunk size line.
    pub fn new() -> Self {
        Self { state: ChunkedState::SizeLine }
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ChunkedDecoder {
    type Item = BodyItem;
    type Error = FramingError;

    /// Decodes chunked transfer encoded data from the input buffer.
    ///
    /// # Returns
    /// - `Ok(Some(BodyItem::Data(bytes)))` when a full chunk is available
    /// - `Ok(Some(BodyItem::End))` once the terminal chunk is consumed
    /// - `Ok(None)` when more data is needed
    /// - `Err(FramingError)` if the chunked framing is invalid
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                ChunkedState::SizeLine => {
                    let Some(line_end) = find_crlf(src) else {
                        ensure!(
                            src.len() <= MAX_SIZE_LINE_BYTES,
                            FramingError::invalid_chunk_size("size line exceeds limit")
                        );
                        return Ok(None);
                    };

                    let size = parse_chunk_size(&src[..line_end])?;
                    src.advance(line_end + 2);

                    if size == 0 {
                        self.state = ChunkedState::Trailer;
                    } else {
                        self.state = ChunkedState::Data { size };
                    }
                }

                ChunkedState::Data { size } => {
                    // whole chunk plus its CRLF terminator must be present,
                    // so the terminator can be verified before emitting
                    let needed = size + 2;
                    if src.len() < needed {
                        src.reserve(needed - src.len());
                        return Ok(None);
                    }

                    let data = src.split_to(size).freeze();
                    ensure!(&src[..2] == b"\r\n", FramingError::InvalidChunkTerminator);
                    src.advance(2);

                    trace!(len = data.len(), "decoded body chunk");
                    self.state = ChunkedState::SizeLine;
                    return Ok(Some(BodyItem::Data(data)));
                }

                ChunkedState::Trailer => {
                    let Some(line_end) = find_crlf(src) else {
                        return Ok(None);
                    };

                    if line_end == 0 {
                        // the empty line after the terminal chunk
                        src.advance(2);
                        self.state = ChunkedState::End;
                    } else {
                        // trailer fields are read and ignored
                        trace!(len = line_end, "skipped trailer field");
                        src.advance(line_end + 2);
                    }
                }

                ChunkedState::End => {
                    trace!("finished reading chunked body");
                    return Ok(Some(BodyItem::End));
                }
            }
        }
    }
}

/// Locates the first CRLF in the buffer, returning the offset of the CR.
fn find_crlf(src: &[u8]) -> Option<usize> {
    src.windows(2).position(|pair| pair == b"\r\n")
}

/// Parses the hexadecimal chunk size at the start of a size line.
///
/// The size field ends at the first `;` (chunk extensions are ignored) and
/// may be padded with linear whitespace. An empty, non-hex or overflowing
/// field is a framing error.
fn parse_chunk_size(line: &[u8]) -> Result<usize, FramingError> {
    let field = line.split(|&b| b == b';').next().unwrap_or(line).trim_ascii();

    ensure!(!field.is_empty(), FramingError::invalid_chunk_size("empty size field"));

    let mut size: u64 = 0;
    for &byte in field {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            other => {
                return Err(FramingError::invalid_chunk_size(format!(
                    "unexpected byte {other:#04x} in size field"
                )))
            }
        };

        size = size
            .checked_mul(16)
            .and_then(|s| s.checked_add(u64::from(digit)))
            .ok_or_else(|| FramingError::invalid_chunk_size("size overflows"))?;
    }

    usize::try_from(size).map_err(|_| FramingError::invalid_chunk_size("size exceeds addressable memory"))
}
