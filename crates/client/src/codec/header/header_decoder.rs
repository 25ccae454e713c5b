//! HTTP response head decoder.
//!
//! This module parses a raw response head (status line plus header block
//! up to and including the CRLFCRLF terminator) into a structured
//! [`ResponseHead`], and derives the body framing mode from it.
//!
//! # Features
//!
//! - Single linear pass using `httparse`; headers land in a multimap that
//!   answers every later lookup without rescanning the block
//! - Zero-copy header values sliced out of the shared head buffer
//! - Built-in protection against oversized or over-long header blocks
//! - Framing selection: `Content-Length` first, then
//!   `Transfer-Encoding: chunked`, else unframed
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - Maximum head size: 16KB

use bytes::BytesMut;
use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode, Version};
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{BodyFraming, FramingError, ResponseHead};

/// Maximum number of headers allowed in a response
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire head section
const MAX_HEADER_BYTES: usize = 16 * 1024;

/// Decoder for HTTP response heads implementing the [`Decoder`] trait.
///
/// Yields the parsed [`ResponseHead`] together with the [`BodyFraming`]
/// the body reader must use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDecoder {
    /// Responses to HEAD requests describe a body that is never sent.
    bodiless: bool,
}

impl HeaderDecoder {
    /// Creates a decoder for a response that may carry a body.
    pub fn new() -> Self {
        Self { bodiless: false }
    }

    /// Creates a decoder for the response to a HEAD request.
    pub fn for_head_request() -> Self {
        Self { bodiless: true }
    }
}

impl Default for HeaderDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte ranges of one header's name and value inside the head buffer.
///
/// Recording positions instead of copying lets the header values share the
/// head buffer after it is frozen.
#[derive(Clone, Copy, Default)]
struct FieldRange {
    name: (usize, usize),
    value: (usize, usize),
}

impl Decoder for HeaderDecoder {
    type Item = (ResponseHead, BodyFraming);
    type Error = FramingError;

    /// Attempts to decode a response head from the provided buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((head, framing)))` if a complete head was parsed
    /// - `Ok(None)` if the head terminator has not arrived yet
    /// - `Err(FramingError)` if the peer's bytes are not a valid head
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // shortest possible head is "HTTP/1.1 200\r\n\r\n"
        if src.len() < 16 {
            return Ok(None);
        }

        let mut parsed_headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut parsed = httparse::Response::new(&mut parsed_headers);

        let parse_status = parsed.parse(src).map_err(|e| match e {
            Error::TooManyHeaders => FramingError::too_many_headers(MAX_HEADER_NUM),
            e => FramingError::invalid_header(e.to_string()),
        })?;

        let head_len = match parse_status {
            Status::Complete(head_len) => head_len,
            Status::Partial => {
                ensure!(src.len() <= MAX_HEADER_BYTES, FramingError::too_large_header(src.len(), MAX_HEADER_BYTES));
                return Ok(None);
            }
        };

        trace!(head_len, "parsed response head");
        ensure!(head_len <= MAX_HEADER_BYTES, FramingError::too_large_header(head_len, MAX_HEADER_BYTES));

        let version = match parsed.version {
            Some(1) => Version::HTTP_11,
            Some(0) => Version::HTTP_10,
            other => return Err(FramingError::InvalidVersion(other)),
        };

        let status = parsed
            .code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .ok_or_else(|| FramingError::invalid_status_line("missing or out-of-range status code"))?;

        // record where each field sits, then let go of the borrow so the
        // head bytes can be split off and shared
        let header_count = parsed.headers.len();
        let mut ranges = [FieldRange::default(); MAX_HEADER_NUM];
        let base = src.as_ptr() as usize;
        for (header, range) in parsed.headers.iter().zip(ranges.iter_mut()) {
            let name_start = header.name.as_ptr() as usize - base;
            range.name = (name_start, name_start + header.name.len());
            let value_start = header.value.as_ptr() as usize - base;
            range.value = (value_start, value_start + header.value.len());
        }

        let head_bytes = src.split_to(head_len).freeze();

        let mut headers = HeaderMap::with_capacity(header_count);
        for range in &ranges[..header_count] {
            let name = HeaderName::from_bytes(&head_bytes[range.name.0..range.name.1])
                .map_err(|e| FramingError::invalid_header(e.to_string()))?;
            let value = HeaderValue::from_maybe_shared(head_bytes.slice(range.value.0..range.value.1))
                .map_err(|e| FramingError::invalid_header(e.to_string()))?;
            headers.append(name, value);
        }

        let (mut parts, ()) = Response::new(()).into_parts();
        parts.status = status;
        parts.version = version;
        parts.headers = headers;

        let head = ResponseHead::from(parts);
        let framing = body_framing(&head, self.bodiless)?;

        Ok(Some((head, framing)))
    }
}

/// Derives the body framing mode from a parsed head.
///
/// A recognized `Content-Length` takes precedence; failing that, a
/// `Transfer-Encoding` whose final coding is `chunked` selects chunked
/// decoding; failing both the response is unframed and its stream is the
/// caller's to read. HEAD responses and 204/304 never carry a body, and
/// interim (1xx) responses take the unframed path.
fn body_framing(head: &ResponseHead, bodiless: bool) -> Result<BodyFraming, FramingError> {
    let status = head.status();

    if bodiless || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED {
        return Ok(BodyFraming::Empty);
    }

    if status.is_informational() {
        return Ok(BodyFraming::Unframed);
    }

    if let Some(value) = head.headers().get(CONTENT_LENGTH) {
        let text = value.to_str().map_err(|_| FramingError::invalid_content_length("value can't to_str"))?;
        let length =
            text.trim().parse::<u64>().map_err(|_| FramingError::invalid_content_length(format!("value {text} is not u64")))?;

        return Ok(if length == 0 { BodyFraming::Empty } else { BodyFraming::Length(length) });
    }

    if is_chunked(head.headers().get(TRANSFER_ENCODING)) {
        return Ok(BodyFraming::Chunked);
    }

    Ok(BodyFraming::Unframed)
}

/// Checks if the Transfer-Encoding header indicates chunked encoding.
///
/// According to RFC 7230, chunked must be the last encoding if present.
fn is_chunked(header_value: Option<&HeaderValue>) -> bool {
    const CHUNKED: &[u8] = b"chunked";
    if let Some(value) = header_value {
        if let Some(bytes) = value.as_bytes().rsplit(|b| *b == b',').next() {
            return bytes.trim_ascii().eq_ignore_ascii_case(CHUNKED);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::SET_COOKIE;
    use indoc::indoc;

    fn decode(input: &[u8]) -> Result<Option<(ResponseHead, BodyFraming)>, FramingError> {
        HeaderDecoder::new().decode(&mut BytesMut::from(input))
    }

    #[test]
    fn from_typical_server() {
        let str = indoc! {r##"
        HTTP/1.1 200 OK
        Server: nginx/1.24.0
        Content-Type: text/html
        Content-Length: 4
        Connection: keep-alive

        body"##};

        let mut buf = BytesMut::from(str);
        let (head, framing) = HeaderDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.status(), StatusCode::OK);
        assert_eq!(head.version(), Version::HTTP_11);
        assert_eq!(head.headers().len(), 4);
        assert_eq!(head.headers().get("server").unwrap(), "nginx/1.24.0");
        assert!(!head.wants_close());
        assert_eq!(framing, BodyFraming::Length(4));

        assert_eq!(&buf[..], b"body");
    }

    #[test]
    fn content_length_head() {
        let mut buf = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello"[..]);

        let (head, framing) = HeaderDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.status(), StatusCode::OK);
        assert_eq!(head.version(), Version::HTTP_11);
        assert_eq!(framing, BodyFraming::Length(5));

        // the body bytes stay in the buffer for the body decoder
        assert_eq!(&buf[..], b"hello");
    }

    #[test]
    fn partial_head_waits_for_terminator() {
        let mut buf = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n"[..]);
        assert!(HeaderDecoder::new().decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"\r\nhello");
        let (_, framing) = HeaderDecoder::new().decode(&mut buf).unwrap().unwrap();
        assert_eq!(framing, BodyFraming::Length(5));
    }

    #[test]
    fn chunked_head() {
        let result = decode(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n").unwrap().unwrap();
        assert_eq!(result.1, BodyFraming::Chunked);
    }

    #[test]
    fn lowercase_header_names_match() {
        let result = decode(b"HTTP/1.1 200 OK\r\ntransfer-encoding: chunked\r\n\r\n").unwrap().unwrap();
        assert_eq!(result.1, BodyFraming::Chunked);

        let result = decode(b"HTTP/1.1 200 OK\r\ncontent-length: 12\r\n\r\n").unwrap().unwrap();
        assert_eq!(result.1, BodyFraming::Length(12));
    }

    #[test]
    fn content_length_takes_precedence_over_chunked() {
        let result = decode(
            b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\nTransfer-Encoding: chunked\r\n\r\n",
        )
        .unwrap()
        .unwrap();
        assert_eq!(result.1, BodyFraming::Length(3));
    }

    #[test]
    fn chunked_must_be_the_final_coding() {
        let result = decode(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked, gzip\r\n\r\n").unwrap().unwrap();
        assert_eq!(result.1, BodyFraming::Unframed);

        let result = decode(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: gzip, chunked\r\n\r\n").unwrap().unwrap();
        assert_eq!(result.1, BodyFraming::Chunked);
    }

    #[test]
    fn neither_framing_header_is_unframed() {
        let result = decode(b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: example\r\n\r\n").unwrap().unwrap();
        assert_eq!(result.0.status(), StatusCode::SWITCHING_PROTOCOLS);
        assert_eq!(result.1, BodyFraming::Unframed);
    }

    #[test]
    fn unparsable_content_length_is_a_framing_error() {
        let result = decode(b"HTTP/1.1 200 OK\r\nContent-Length: banana\r\n\r\n");
        assert!(matches!(result, Err(FramingError::InvalidContentLength { .. })));
    }

    #[test]
    fn zero_content_length_is_empty() {
        let result = decode(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n").unwrap().unwrap();
        assert_eq!(result.1, BodyFraming::Empty);
    }

    #[test]
    fn head_request_responses_are_bodiless() {
        let mut buf = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 512\r\n\r\n"[..]);
        let (_, framing) = HeaderDecoder::for_head_request().decode(&mut buf).unwrap().unwrap();
        assert_eq!(framing, BodyFraming::Empty);
    }

    #[test]
    fn no_content_status_is_bodiless() {
        let result = decode(b"HTTP/1.1 204 No Content\r\n\r\n").unwrap().unwrap();
        assert_eq!(result.1, BodyFraming::Empty);
    }

    #[test]
    fn repeated_set_cookie_headers_are_all_kept() {
        let (head, _) = decode(
            b"HTTP/1.1 200 OK\r\nSet-Cookie: a=1; Path=/\r\nContent-Length: 0\r\nSet-Cookie: b=2\r\n\r\n",
        )
        .unwrap()
        .unwrap();

        let cookies: Vec<_> = head.header_values(SET_COOKIE).map(|v| v.to_str().unwrap()).collect();
        assert_eq!(cookies, vec!["a=1; Path=/", "b=2"]);
    }

    #[test]
    fn oversized_partial_head_is_rejected() {
        let filler = "a".repeat(1024);
        let mut buf = BytesMut::new();
        buf.extend_from_slice(b"HTTP/1.1 200 OK\r\n");
        for i in 0..20 {
            buf.extend_from_slice(format!("X-Filler-{i}: {filler}\r\n").as_bytes());
        }

        let result = HeaderDecoder::new().decode(&mut buf);
        assert!(matches!(result, Err(FramingError::TooLargeHeader { .. })));
    }

    #[test]
    fn too_many_headers_is_rejected() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(b"HTTP/1.1 200 OK\r\n");
        for i in 0..(MAX_HEADER_NUM + 1) {
            buf.extend_from_slice(format!("X-Filler-{i}: yes\r\n").as_bytes());
        }
        buf.extend_from_slice(b"\r\n");

        let result = HeaderDecoder::new().decode(&mut buf);
        assert!(matches!(result, Err(FramingError::TooManyHeaders { .. })));
    }
}
