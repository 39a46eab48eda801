//! Per-direction hash chains used for packet integrity.
//!
//! Each direction of a session (client-to-server, server-to-client)
//! maintains a running "chain tip": the BLAKE3-256 digest of the most
//! recently sent full wire packet. Every subsequent packet in that
//! direction carries the sender's current tip as `prev_hash`, and the
//! receiver checks it against its own record of that tip before accepting
//! the packet - a break in the chain signals a dropped, reordered, or
//! forged packet. This is a plain digest, not the domain-separated /
//! labeled link construction some session protocols use; the wire format
//! has no room for a label.

/// Size in bytes of a chain tip.
pub const TIP_SIZE: usize = 32;

/// Compute the chain tip for a fully-serialized wire packet.
pub fn chain_tip(packet_bytes: &[u8]) -> [u8; TIP_SIZE] {
    blake3::hash(packet_bytes).into()
}

/// The all-zero tip a session starts with before any packet has been sent
/// in a given direction.
pub const GENESIS_TIP: [u8; TIP_SIZE] = [0u8; TIP_SIZE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_input() {
        let packet = b"some serialized packet bytes";
        assert_eq!(chain_tip(packet), chain_tip(packet));
    }

    #[test]
    fn sensitive_to_single_byte_change() {
        let mut packet = b"some serialized packet bytes".to_vec();
        let tip_before = chain_tip(&packet);
        packet[0] ^= 1;
        let tip_after = chain_tip(&packet);
        assert_ne!(tip_before, tip_after);
    }

    #[test]
    fn genesis_tip_is_zero() {
        assert_eq!(GENESIS_TIP, [0u8; TIP_SIZE]);
    }
}
