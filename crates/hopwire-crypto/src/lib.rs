//! hopwire-crypto - cryptographic primitives for the hopwire secure datagram protocol.
//!
//! # Module layout
//! - `x25519`     - ephemeral keypair generation and raw Diffie-Hellman shared secrets
//! - `aead`       - ChaCha20-Poly1305 encrypt/decrypt with explicit random nonces
//! - `hash_chain` - BLAKE3-256 hash-chain tips used for per-direction packet integrity
//! - `pq`         - post-quantum hybrid key-exchange extension point (unimplemented)
//! - `error`      - unified error type
//!
//! # Known weakness
//! The shared secret produced by [`x25519::shared_secret`] is used directly as the
//! AEAD key with no KDF applied. This is intentional (see `DESIGN.md`, Open Question 1)
//! and preserved for wire compatibility with the reference implementation.

#![forbid(unsafe_code)]

pub mod aead;
pub mod error;
pub mod hash_chain;
pub mod pq;
pub mod x25519;

pub use error::CryptoError;
