//! Unified decoder for response bodies.
//!
//! Dispatches to the length or chunked decoder selected by the response's
//! framing mode. Bodiless framings complete immediately.

use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::codec::body::chunked_decoder::ChunkedDecoder;
use crate::codec::body::length_decoder::LengthDecoder;
use crate::protocol::{BodyFraming, BodyItem, FramingError};

/// A decoder for response bodies in any framing mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyDecoder {
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// Body with a declared length.
    Length(LengthDecoder),
    /// Body using chunked transfer encoding.
    Chunked(ChunkedDecoder),
    /// No body to read, for empty responses and unframed handoffs alike.
    None,
}

impl BodyDecoder {
    /// Creates a decoder for a body of exactly `size` bytes.
    pub fn length(size: u64) -> Self {
        Self { kind: Kind::Length(LengthDecoder::new(size)) }
    }

    /// Creates a decoder for a chunked body.
    pub fn chunked() -> Self {
        Self { kind: Kind::Chunked(ChunkedDecoder::new()) }
    }

    /// Creates a decoder that completes without reading anything.
    pub fn none() -> Self {
        Self { kind: Kind::None }
    }

    /// Returns true if this decoder handles chunked transfer encoding.
    pub fn is_chunked(&self) -> bool {
        matches!(self.kind, Kind::Chunked(_))
    }
}

/// Selects the decoder matching a framing mode.
///
/// Unframed responses map to the no-body decoder: the engine does not read
/// their stream, the caller does.
impl From<BodyFraming> for BodyDecoder {
    fn from(framing: BodyFraming) -> Self {
        match framing {
            BodyFraming::Length(size) => Self::length(size),
            BodyFraming::Chunked => Self::chunked(),
            BodyFraming::Empty | BodyFraming::Unframed => Self::none(),
        }
    }
}

impl Decoder for BodyDecoder {
    type Item = BodyItem;
    type Error = FramingError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match &mut self.kind {
            Kind::Length(length_decoder) => length_decoder.decode(src),
            Kind::Chunked(chunked_decoder) => chunked_decoder.decode(src),
            Kind::None => Ok(Some(BodyItem::End)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_selects_the_matching_kind() {
        assert!(matches!(BodyDecoder::from(BodyFraming::Length(9)).kind, Kind::Length(_)));
        assert!(BodyDecoder::from(BodyFraming::Chunked).is_chunked());
        assert!(matches!(BodyDecoder::from(BodyFraming::Empty).kind, Kind::None));
        assert!(matches!(BodyDecoder::from(BodyFraming::Unframed).kind, Kind::None));
    }

    #[test]
    fn none_kind_completes_without_input() {
        let mut buffer = BytesMut::new();
        let mut decoder = BodyDecoder::none();
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_end());
    }
}
