//! ChaCha20-Poly1305 AEAD encryption for packet payloads.
//!
//! Uses the narrow (12-byte nonce) ChaCha20Poly1305 construction, not the
//! extended-nonce XChaCha20Poly1305 variant - the wire format carries a
//! random nonce per packet and relies on the low collision probability of a
//! fresh key per session rather than a larger nonce space. Associated data
//! is always empty.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;

use crate::error::CryptoError;

/// Size in bytes of the AEAD key.
pub const KEY_SIZE: usize = 32;
/// Size in bytes of the AEAD nonce.
pub const NONCE_SIZE: usize = 12;

/// Generate a fresh random 12-byte nonce.
pub fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypt `plaintext` under `key` and `nonce` with empty associated data.
///
/// Returns ciphertext with the 16-byte Poly1305 tag appended.
pub fn encrypt(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .encrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad: &[],
            },
        )
        .map_err(|_| CryptoError::Encrypt)
}

/// Decrypt `ciphertext` (tag included) under `key` and `nonce`.
///
/// Returns `Err(CryptoError::Decrypt)` on authentication failure - this is
/// the expected, silent outcome when a server trial-decrypts a packet
/// against a session that isn't the sender's.
pub fn decrypt(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: &[],
            },
        )
        .map_err(|_| CryptoError::Decrypt)
}
