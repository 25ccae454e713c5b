//! Response head parsing.

mod header_decoder;

pub use header_decoder::HeaderDecoder;
