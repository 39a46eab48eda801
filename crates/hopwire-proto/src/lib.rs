//! hopwire-proto - wire framing and inner message codec.
//!
//! - `packet`  - fixed 38-byte header framing for `SecurePacket`
//! - `message` - JSON-encoded `DataMessage` carried inside a Data packet's payload
//! - `error`   - framing error type

#![forbid(unsafe_code)]

mod base64_field;
pub mod error;
pub mod message;
pub mod packet;

pub use error::FramingError;
pub use message::{DataMessage, SERVER_REPLY_SESSION_ID};
pub use packet::{PacketHeader, PacketType, SecurePacket, HASH_SIZE, HEADER_SIZE, VERSION};
