use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("AEAD encryption failed")]
    Encrypt,

    #[error("AEAD decryption failed (authentication tag mismatch - possible tampering)")]
    Decrypt,

    #[error("invalid key material: {0}")]
    InvalidKey(String),

    #[error("invalid nonce length: expected 12 bytes, got {0}")]
    InvalidNonce(usize),
}
