use thiserror::Error;

/// Why a received packet was rejected by [`crate::session::Session::recv_validate`].
///
/// Both checks are independent and mandatory - passing one without the
/// other must not advance receive state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("hash chain broken: prev_hash did not match the expected chain tip")]
    ChainBroken,

    #[error("sequence out of order: expected {expected}, got {got}")]
    OutOfOrder { expected: u64, got: u64 },
}
