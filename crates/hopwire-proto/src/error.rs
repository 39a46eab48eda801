use thiserror::Error;

/// Errors raised while framing or parsing the wire packet layout.
///
/// All of these are drop-silently conditions at the dispatcher level; the
/// error type exists so tests and logging can distinguish the cause.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    #[error("short read: need at least {needed} bytes, got {got}")]
    ShortRead { needed: usize, got: usize },

    #[error("length field mismatch: header declared {declared}, actual remaining {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("unsupported protocol version: {0}")]
    VersionMismatch(u8),

    #[error("unknown packet type: {0}")]
    UnknownType(u8),
}
