//! Per-session state shared between the send and receive directions of one
//! client/server pair.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Mutex;

use hopwire_crypto::hash_chain::{self, TIP_SIZE};
use rand::RngCore;

use crate::pending::Pending;
use crate::validator::ValidationError;

/// Size in bytes of a session id.
pub const SESSION_ID_SIZE: usize = 16;

/// Opaque, server-assigned session identifier, rendered on the wire (inside
/// the handshake response and echoed in `DataMessage::session_id`) as 32
/// lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId([u8; SESSION_ID_SIZE]);

impl SessionId {
    /// Generate a fresh random session id.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SESSION_ID_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        SessionId(bytes)
    }

    pub fn from_bytes(bytes: [u8; SESSION_ID_SIZE]) -> Self {
        SessionId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SESSION_ID_SIZE] {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for SessionId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; SESSION_ID_SIZE];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(SessionId(bytes))
    }
}

/// One direction's chain tip and sequence counter. Used for both `rx`
/// (where `sequence` means "next expected") and `tx` (where `sequence`
/// means "next to assign").
#[derive(Debug, Clone, Copy)]
pub struct ChainState {
    pub last_hash: [u8; TIP_SIZE],
    pub sequence: u64,
}

impl ChainState {
    fn genesis() -> Self {
        ChainState {
            last_hash: hash_chain::GENESIS_TIP,
            sequence: 0,
        }
    }
}

/// Per-peer session state. A single type serves both client and server
/// sessions; server sessions simply never populate `current_port`/`pending`.
pub struct Session {
    pub session_id: SessionId,
    pub shared_key: [u8; 32],

    rx: Mutex<ChainState>,
    tx: Mutex<ChainState>,

    /// Client-only: destination port for the next data message. `None` on
    /// server-side sessions.
    pub current_port: Option<AtomicU16>,

    /// Client-only: unacknowledged sends keyed by sequence number. Always
    /// empty on server-side sessions.
    pub pending: Mutex<HashMap<u64, Pending>>,
}

impl Session {
    /// Construct a freshly handshaked session. Both chains start at the
    /// genesis tip with sequence zero - the handshake packet itself is not
    /// part of either chain.
    pub fn new(session_id: SessionId, shared_key: [u8; 32]) -> Self {
        Session {
            session_id,
            shared_key,
            rx: Mutex::new(ChainState::genesis()),
            tx: Mutex::new(ChainState::genesis()),
            current_port: None,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Construct a client-side session, additionally tracking the
    /// destination port for the next send.
    pub fn new_client(session_id: SessionId, shared_key: [u8; 32], first_port: u16) -> Self {
        Session {
            current_port: Some(AtomicU16::new(first_port)),
            ..Session::new(session_id, shared_key)
        }
    }

    /// Snapshot the send direction's current sequence and chain tip,
    /// without advancing either. Call this before building and serializing
    /// the outgoing packet.
    pub fn send_prepare(&self) -> (u64, [u8; TIP_SIZE]) {
        let tx = self.tx.lock().unwrap();
        (tx.sequence, tx.last_hash)
    }

    /// Commit a send: advance the tx chain tip to the hash of the fully
    /// serialized packet and increment the tx sequence. Must be called
    /// with the exact bytes that were placed on the wire.
    pub fn send_commit(&self, packet_bytes: &[u8]) {
        let mut tx = self.tx.lock().unwrap();
        tx.last_hash = hash_chain::chain_tip(packet_bytes);
        tx.sequence += 1;
    }

    /// Validate a received packet against the rx chain and sequence, and
    /// advance rx state on success. Neither check's success alone advances
    /// anything - both must pass.
    pub fn recv_validate(
        &self,
        packet_bytes: &[u8],
        prev_hash: [u8; TIP_SIZE],
        msg_seq: u64,
    ) -> Result<(), ValidationError> {
        let mut rx = self.rx.lock().unwrap();

        if prev_hash != rx.last_hash {
            return Err(ValidationError::ChainBroken);
        }
        if msg_seq != rx.sequence {
            return Err(ValidationError::OutOfOrder {
                expected: rx.sequence,
                got: msg_seq,
            });
        }

        rx.last_hash = hash_chain::chain_tip(packet_bytes);
        rx.sequence += 1;
        Ok(())
    }

    /// The client's current view of the highest server sequence it has
    /// validated, for echoing as `ack_seq` on every outgoing message (see
    /// `SPEC_FULL.md`'s supplemented client ack behavior).
    pub fn last_acked_seq(&self) -> u64 {
        self.rx.lock().unwrap().sequence.saturating_sub(1)
    }

    /// Update the client's destination port for its next send.
    pub fn set_current_port(&self, port: u16) {
        if let Some(current) = &self.current_port {
            current.store(port, Ordering::SeqCst);
        }
    }

    pub fn current_port(&self) -> Option<u16> {
        self.current_port
            .as_ref()
            .map(|p| p.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_hex_round_trip() {
        let id = SessionId::generate();
        let rendered = id.to_string();
        assert_eq!(rendered.len(), SESSION_ID_SIZE * 2);
        let parsed: SessionId = rendered.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn first_data_packet_has_genesis_prev_hash() {
        let session = Session::new(SessionId::generate(), [0u8; 32]);
        let (seq, prev_hash) = session.send_prepare();
        assert_eq!(seq, 0);
        assert_eq!(prev_hash, hash_chain::GENESIS_TIP);
    }

    #[test]
    fn send_commit_advances_sequence_and_chain() {
        let session = Session::new(SessionId::generate(), [0u8; 32]);
        session.send_commit(b"packet one");
        let (seq, prev_hash) = session.send_prepare();
        assert_eq!(seq, 1);
        assert_eq!(prev_hash, hash_chain::chain_tip(b"packet one"));
    }

    #[test]
    fn recv_validate_accepts_in_order_chained_packet() {
        let session = Session::new(SessionId::generate(), [0u8; 32]);
        let packet = b"first received packet";
        session
            .recv_validate(packet, hash_chain::GENESIS_TIP, 0)
            .unwrap();
        assert_eq!(session.last_acked_seq(), 0);
    }

    #[test]
    fn recv_validate_rejects_chain_break() {
        let session = Session::new(SessionId::generate(), [0u8; 32]);
        let bogus_prev_hash = [9u8; TIP_SIZE];
        let result = session.recv_validate(b"packet", bogus_prev_hash, 0);
        assert_eq!(result, Err(ValidationError::ChainBroken));
    }

    #[test]
    fn recv_validate_rejects_out_of_order_sequence() {
        let session = Session::new(SessionId::generate(), [0u8; 32]);
        let result = session.recv_validate(b"packet", hash_chain::GENESIS_TIP, 5);
        assert_eq!(
            result,
            Err(ValidationError::OutOfOrder { expected: 0, got: 5 })
        );
    }

    #[test]
    fn replay_of_accepted_packet_is_rejected() {
        let session = Session::new(SessionId::generate(), [0u8; 32]);
        let packet = b"packet zero";
        session
            .recv_validate(packet, hash_chain::GENESIS_TIP, 0)
            .unwrap();
        // Replaying the exact same bytes: rx.last_hash has already advanced
        // past genesis, so the stale prev_hash no longer matches.
        let result = session.recv_validate(packet, hash_chain::GENESIS_TIP, 0);
        assert_eq!(result, Err(ValidationError::ChainBroken));
    }

    #[test]
    fn client_session_tracks_current_port() {
        let session = Session::new_client(SessionId::generate(), [0u8; 32], 40000);
        assert_eq!(session.current_port(), Some(40000));
        session.set_current_port(41234);
        assert_eq!(session.current_port(), Some(41234));
    }

    #[test]
    fn server_session_has_no_current_port() {
        let session = Session::new(SessionId::generate(), [0u8; 32]);
        assert_eq!(session.current_port(), None);
    }
}
