//! HTTP response decoder module
//!
//! This module decodes complete HTTP responses using a streaming approach:
//! the head is parsed first, and the framing mode it declares selects the
//! body decoder used for the rest of the message.
//!
//! # Components
//!
//! - [`ResponseDecoder`]: main decoder coordinating head and body parsing
//! - Head parsing: [`HeaderDecoder`]
//! - Body decoding: [`BodyDecoder`] selected from the head's framing

use bytes::BytesMut;
use http::Method;
use tokio_util::codec::Decoder;

use crate::codec::body::BodyDecoder;
use crate::codec::header::HeaderDecoder;
use crate::protocol::{BodyItem, FramingError, ResponseFrame};

/// A decoder for HTTP responses that handles both head and body.
///
/// The decoder operates in two phases, tracked by the `body_decoder`
/// field:
/// - `None`: currently parsing the head
/// - `Some(BodyDecoder)`: currently decoding the body
#[derive(Debug)]
pub struct ResponseDecoder {
    header_decoder: HeaderDecoder,
    body_decoder: Option<BodyDecoder>,
}

impl ResponseDecoder {
    /// Creates a decoder for the response to a request with the given
    /// method. HEAD requests get bodiless responses regardless of the
    /// headers the peer sends.
    pub fn for_method(method: &Method) -> Self {
        let header_decoder = if *method == Method::HEAD {
            HeaderDecoder::for_head_request()
        } else {
            HeaderDecoder::new()
        };
        Self { header_decoder, body_decoder: None }
    }

    /// Creates a decoder for a response that may carry a body.
    pub fn new() -> Self {
        Self { header_decoder: HeaderDecoder::new(), body_decoder: None }
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ResponseDecoder {
    type Item = ResponseFrame;
    type Error = FramingError;

    /// Attempts to decode the next frame of an HTTP response.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ResponseFrame::Head(..)))`: the head is complete
    /// - `Ok(Some(ResponseFrame::Body(..)))`: a body item followed
    /// - `Ok(None)`: more bytes are needed
    /// - `Err(_)`: the peer's bytes are not valid HTTP/1.1
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // decode body if the head has already been parsed
        if let Some(body_decoder) = &mut self.body_decoder {
            let frame = match body_decoder.decode(src)? {
                Some(item @ BodyItem::Data(_)) => Some(ResponseFrame::Body(item)),
                Some(item @ BodyItem::End) => {
                    // this response's body is done
                    self.body_decoder.take();
                    Some(ResponseFrame::Body(item))
                }
                None => None,
            };

            return Ok(frame);
        }

        let frame = match self.header_decoder.decode(src)? {
            Some((head, framing)) => {
                self.body_decoder = Some(framing.into());
                Some(ResponseFrame::Head(head, framing))
            }
            None => None,
        };

        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::BodyFraming;
    use http::StatusCode;

    fn decode_all(decoder: &mut ResponseDecoder, buf: &mut BytesMut) -> Vec<ResponseFrame> {
        let mut frames = Vec::new();
        while let Some(frame) = decoder.decode(buf).unwrap() {
            let done = matches!(frame, ResponseFrame::Body(BodyItem::End));
            frames.push(frame);
            if done {
                break;
            }
        }
        frames
    }

    #[test]
    fn length_framed_response() {
        let mut buf = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello"[..]);
        let mut decoder = ResponseDecoder::new();

        let frames = decode_all(&mut decoder, &mut buf);
        assert_eq!(frames.len(), 3);

        let ResponseFrame::Head(head, framing) = &frames[0] else {
            panic!("first frame should be the head");
        };
        assert_eq!(head.status(), StatusCode::OK);
        assert_eq!(*framing, BodyFraming::Length(5));

        let ResponseFrame::Body(BodyItem::Data(data)) = &frames[1] else {
            panic!("second frame should be body data");
        };
        assert_eq!(data.as_ref(), b"hello");

        assert!(matches!(frames[2], ResponseFrame::Body(BodyItem::End)));
    }

    #[test]
    fn chunked_response_across_feeds() {
        let mut buf = BytesMut::from(&b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nte"[..]);
        let mut decoder = ResponseDecoder::new();

        let head = decoder.decode(&mut buf).unwrap().unwrap();
        assert!(head.is_head());

        // chunk incomplete
        assert!(decoder.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"st\r\n0\r\n\r\n");

        let data = decoder.decode(&mut buf).unwrap().unwrap().into_body_item().unwrap();
        assert_eq!(data.as_bytes().unwrap().as_ref(), b"test");

        let end = decoder.decode(&mut buf).unwrap().unwrap().into_body_item().unwrap();
        assert!(end.is_end());
    }

    #[test]
    fn empty_body_completes_without_more_input() {
        let mut buf = BytesMut::from(&b"HTTP/1.1 204 No Content\r\nServer: x\r\n\r\n"[..]);
        let mut decoder = ResponseDecoder::new();

        assert!(decoder.decode(&mut buf).unwrap().unwrap().is_head());
        let end = decoder.decode(&mut buf).unwrap().unwrap().into_body_item().unwrap();
        assert!(end.is_end());
    }

    #[test]
    fn head_request_skips_declared_body() {
        let mut buf = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n"[..]);
        let mut decoder = ResponseDecoder::for_method(&Method::HEAD);

        let ResponseFrame::Head(_, framing) = decoder.decode(&mut buf).unwrap().unwrap() else {
            panic!("expected head frame");
        };
        assert_eq!(framing, BodyFraming::Empty);
    }
}
