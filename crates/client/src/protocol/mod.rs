//! Core protocol abstractions for the client engine.
//!
//! This module provides the building blocks the codec and connection
//! layers are written against:
//!
//! - **Message vocabulary** ([`message`]): what the response decoder emits
//!   - [`ResponseFrame`]: a parsed head or a piece of body
//!   - [`BodyItem`]: body bytes or the end-of-body marker
//!   - [`BodyFraming`]: how the body's end is determined
//!
//! - **Request side** ([`request`]): caller-facing request description
//!   - [`ClientRequest`]: one pending request
//!   - [`RequestHead`]: the assembled wire head
//!
//! - **Response side** ([`response`]): parse-once response head
//!   - [`ResponseHead`]: status, version and the header multimap
//!
//! - **Errors** ([`error`]): the typed failure surface
//!   - [`ClientError`]: connection / timeout / framing, for callers
//!   - [`FramingError`]: what exactly the peer got wrong on the wire

mod message;
pub use message::BodyFraming;
pub use message::BodyItem;
pub use message::ResponseFrame;

mod request;
pub use request::ClientRequest;
pub use request::RequestHead;

mod response;
pub use response::ResponseHead;

mod error;
pub use error::ClientError;
pub use error::FramingError;
