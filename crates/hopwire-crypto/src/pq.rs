//! Post-quantum hybrid key exchange extension point.
//!
//! The reference implementation carries commented-out hooks for a hybrid
//! classical/post-quantum handshake (`GenerateHybridKeys`,
//! `HybridSharedSecret`) that were never wired up. This module preserves
//! that extension point explicitly rather than silently dropping it.
//!
//! TODO: wire in a liboqs-backed Kyber exchange once a vetted pure-Rust
//! implementation is available in the dependency set.

use crate::error::CryptoError;

/// Always returns an error - hybrid key exchange is not implemented.
pub fn generate_hybrid_keypair() -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
    Err(CryptoError::InvalidKey(
        "post-quantum hybrid key exchange is not implemented".into(),
    ))
}

/// Always returns an error - hybrid key exchange is not implemented.
pub fn hybrid_shared_secret(_private: &[u8], _peer_public: &[u8]) -> Result<Vec<u8>, CryptoError> {
    Err(CryptoError::InvalidKey(
        "post-quantum hybrid key exchange is not implemented".into(),
    ))
}
