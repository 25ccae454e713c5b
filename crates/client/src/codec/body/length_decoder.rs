//! Decoder implementation for bodies framed by a Content-Length header.
//!
//! The body is exactly the declared number of bytes; anything after it in
//! the buffer belongs to the next exchange and is left untouched.

use std::cmp;

use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::protocol::{BodyItem, FramingError};

/// A decoder for response bodies with a known content length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// Bytes of body still to be read off the wire.
    remaining: u64,
}

impl LengthDecoder {
    /// Creates a decoder expecting exactly `length` body bytes.
    pub fn new(length: u64) -> Self {
        Self { remaining: length }
    }
}

impl Decoder for LengthDecoder {
    type Item = BodyItem;
    type Error = FramingError;

    /// Emits body bytes as they arrive, up to the declared length.
    ///
    /// # Returns
    /// - `Ok(Some(BodyItem::Data(bytes)))` for each available run of bytes
    /// - `Ok(Some(BodyItem::End))` once the declared length is consumed
    /// - `Ok(None)` when more data is needed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.remaining == 0 {
            return Ok(Some(BodyItem::End));
        }

        if src.is_empty() {
            return Ok(None);
        }

        let take = cmp::min(self.remaining, src.len() as u64);
        let bytes = src.split_to(take as usize).freeze();

        self.remaining -= bytes.len() as u64;
        Ok(Some(BodyItem::Data(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_exactly_the_declared_length() {
        let mut buffer = BytesMut::from(&b"hello, and some pipelined leftovers"[..]);
        let mut decoder = LengthDecoder::new(5);

        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.as_bytes().unwrap().as_ref(), b"hello");

        let end = decoder.decode(&mut buffer).unwrap().unwrap();
        assert!(end.is_end());

        // the rest of the buffer stays put
        assert_eq!(&buffer[..], b", and some pipelined leftovers");
    }

    #[test]
    fn emits_partial_runs_until_complete() {
        let mut buffer = BytesMut::from(&b"abc"[..]);
        let mut decoder = LengthDecoder::new(6);

        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.as_bytes().unwrap().as_ref(), b"abc");

        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"def");
        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.as_bytes().unwrap().as_ref(), b"def");

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_end());
    }

    #[test]
    fn zero_length_is_immediately_complete() {
        let mut buffer = BytesMut::new();
        let mut decoder = LengthDecoder::new(0);
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_end());
    }
}
