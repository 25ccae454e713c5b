//! Body decoding for the two recognized framing modes.
//!
//! - [`LengthDecoder`]: bodies framed by `Content-Length`
//! - [`ChunkedDecoder`]: bodies framed by `Transfer-Encoding: chunked`
//! - [`BodyDecoder`]: dispatch over both, selected from [`BodyFraming`]
//!
//! [`BodyFraming`]: crate::protocol::BodyFraming

mod body_decoder;
mod chunked_decoder;
mod length_decoder;

pub use body_decoder::BodyDecoder;
pub use chunked_decoder::ChunkedDecoder;
pub use length_decoder::LengthDecoder;
