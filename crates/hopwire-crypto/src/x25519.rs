//! X25519 ephemeral key agreement.
//!
//! Keys are raw 32-byte arrays rather than the library's newtypes so callers
//! can place them directly on the wire (see `hopwire-proto`'s handshake
//! payload layout). The clamp is applied explicitly per RFC 7748 even though
//! `x25519-dalek`'s `StaticSecret` clamps internally - this keeps the
//! byte-level behavior visible and auditable at the call site.

use rand::RngCore;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

/// Size in bytes of an X25519 private or public key.
pub const KEY_SIZE: usize = 32;

/// Generate a fresh ephemeral X25519 keypair.
///
/// Returns `(private, public)`.
pub fn generate_keypair() -> ([u8; KEY_SIZE], [u8; KEY_SIZE]) {
    let mut private = [0u8; KEY_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut private);
    clamp(&mut private);

    let mut secret = StaticSecret::from(private);
    let public = PublicKey::from(&secret);
    secret.zeroize();

    (private, *public.as_bytes())
}

/// Compute the raw X25519 shared secret `DH(private, peer_public)`.
///
/// No KDF is applied - the 32 raw output bytes are the AEAD key directly.
/// This is a known weakness; see `DESIGN.md` Open Question 1.
pub fn shared_secret(private: &[u8; KEY_SIZE], peer_public: &[u8; KEY_SIZE]) -> [u8; KEY_SIZE] {
    let mut secret = StaticSecret::from(*private);
    let peer = PublicKey::from(*peer_public);
    let shared = secret.diffie_hellman(&peer).to_bytes();
    secret.zeroize();
    shared
}

/// Apply the RFC 7748 clamp to a raw private scalar in place.
fn clamp(private: &mut [u8; KEY_SIZE]) {
    private[0] &= 248;
    private[31] &= 127;
    private[31] |= 64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_sets_expected_bits() {
        let mut key = [0xffu8; KEY_SIZE];
        clamp(&mut key);
        assert_eq!(key[0] & 0b0000_0111, 0);
        assert_eq!(key[31] & 0b1000_0000, 0);
        assert_eq!(key[31] & 0b0100_0000, 0b0100_0000);
    }

    #[test]
    fn shared_secret_matches_both_directions() {
        let (a_priv, a_pub) = generate_keypair();
        let (b_priv, b_pub) = generate_keypair();

        let a_view = shared_secret(&a_priv, &b_pub);
        let b_view = shared_secret(&b_priv, &a_pub);

        assert_eq!(a_view, b_view);
    }

    #[test]
    fn distinct_keypairs_yield_distinct_keys() {
        let (priv1, pub1) = generate_keypair();
        let (priv2, _pub2) = generate_keypair();
        assert_ne!(priv1, priv2);
        assert_ne!(pub1, [0u8; KEY_SIZE]);
    }
}
