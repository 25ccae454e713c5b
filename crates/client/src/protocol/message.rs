use bytes::Bytes;

use crate::protocol::ResponseHead;

/// A decoded piece of an HTTP/1.1 response stream.
///
/// The response decoder produces exactly one `Head` frame per exchange,
/// followed by zero or more `Body` frames ending with [`BodyItem::End`].
#[derive(Debug)]
pub enum ResponseFrame {
    /// The parsed status line and header block, plus the framing mode
    /// derived from it.
    Head(ResponseHead, BodyFraming),
    /// A piece of the response body.
    Body(BodyItem),
}

/// An item in the decoded body stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyItem {
    /// A run of decoded body bytes.
    Data(Bytes),
    /// The body is complete.
    End,
}

/// How a response body's end is determined.
///
/// `Unframed` covers responses carrying neither a recognized
/// `Content-Length` nor `Transfer-Encoding: chunked`: protocol upgrades
/// and other non-standard replies whose stream the caller must read
/// directly.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BodyFraming {
    /// Body with a known length in bytes.
    Length(u64),
    /// Body using chunked transfer encoding.
    Chunked,
    /// No body follows the header block.
    Empty,
    /// No recognized framing; the connection is handed to the caller.
    Unframed,
}

impl BodyFraming {
    /// Returns true if the body uses chunked transfer encoding.
    #[inline]
    pub fn is_chunked(&self) -> bool {
        matches!(self, BodyFraming::Chunked)
    }

    /// Returns true if no body follows the header block.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, BodyFraming::Empty)
    }

    /// Returns true if the response carries no recognized framing.
    #[inline]
    pub fn is_unframed(&self) -> bool {
        matches!(self, BodyFraming::Unframed)
    }
}

impl ResponseFrame {
    /// Returns true if this frame is the response head.
    #[inline]
    pub fn is_head(&self) -> bool {
        matches!(self, ResponseFrame::Head(..))
    }

    /// Converts the frame into a body item, if it is one.
    pub fn into_body_item(self) -> Option<BodyItem> {
        match self {
            ResponseFrame::Head(..) => None,
            ResponseFrame::Body(item) => Some(item),
        }
    }
}

impl BodyItem {
    /// Returns true if this item marks the end of the body.
    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self, BodyItem::End)
    }

    /// Returns a reference to the contained bytes if this is a data item.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            BodyItem::Data(bytes) => Some(bytes),
            BodyItem::End => None,
        }
    }
}
