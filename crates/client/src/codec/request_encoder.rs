//! HTTP request encoder.
//!
//! Serializes an assembled [`RequestHead`] and optional body into the raw
//! request bytes: `METHOD TARGET HTTP/1.1`, each header line in order, the
//! blank line, then the body. The head's line order is preserved exactly;
//! the caller decides what goes in it and in what order.

use std::io;
use std::io::Write;

use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::{ClientError, RequestHead};

/// Initial buffer size reserved for request serialization
const INIT_REQUEST_SIZE: usize = 1024;

/// Encoder for HTTP requests implementing the [`Encoder`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestEncoder;

impl Encoder<(RequestHead, Option<Bytes>)> for RequestEncoder {
    type Error = ClientError;

    /// Encodes the request line, header lines, blank line and body into
    /// the destination buffer.
    fn encode(&mut self, item: (RequestHead, Option<Bytes>), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (head, body) = item;

        dst.reserve(INIT_REQUEST_SIZE + body.as_ref().map_or(0, Bytes::len));

        write!(FastWrite(dst), "{} {} HTTP/1.1\r\n", head.method(), head.target())?;

        for (name, value) in head.lines() {
            dst.put_slice(name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");

        if let Some(body) = body {
            dst.put_slice(&body);
        }

        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// This is an optimization to avoid unnecessary bounds checking when
/// writing to the bytes buffer, since we've already reserved enough space.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{ACCEPT, CONTENT_LENGTH, COOKIE, HOST};
    use http::{HeaderValue, Method};

    fn encode(head: RequestHead, body: Option<Bytes>) -> String {
        let mut dst = BytesMut::new();
        RequestEncoder.encode((head, body), &mut dst).unwrap();
        String::from_utf8(dst.to_vec()).unwrap()
    }

    #[test]
    fn request_line_and_terminator() {
        let head = RequestHead::new(Method::GET, "/status".to_owned(), vec![]);
        assert_eq!(encode(head, None), "GET /status HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn header_lines_keep_their_order() {
        let head = RequestHead::new(
            Method::GET,
            "/".to_owned(),
            vec![
                (HOST, HeaderValue::from_static("example.com")),
                (ACCEPT, HeaderValue::from_static("*/*")),
                (COOKIE, HeaderValue::from_static("sid=1")),
                (COOKIE, HeaderValue::from_static("theme=dark")),
            ],
        );

        let wire = encode(head, None);
        assert_eq!(
            wire,
            "GET / HTTP/1.1\r\nhost: example.com\r\naccept: */*\r\ncookie: sid=1\r\ncookie: theme=dark\r\n\r\n"
        );
    }

    #[test]
    fn body_follows_the_blank_line() {
        let head = RequestHead::new(
            Method::POST,
            "/submit".to_owned(),
            vec![(CONTENT_LENGTH, HeaderValue::from_static("9"))],
        );

        let wire = encode(head, Some(Bytes::from_static(b"key=value")));
        assert_eq!(wire, "POST /submit HTTP/1.1\r\ncontent-length: 9\r\n\r\nkey=value");
    }

    #[test]
    fn target_query_is_written_verbatim() {
        let head = RequestHead::new(Method::GET, "/search?q=rust&page=2".to_owned(), vec![]);
        assert!(encode(head, None).starts_with("GET /search?q=rust&page=2 HTTP/1.1\r\n"));
    }
}
