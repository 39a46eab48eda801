//! The port-hopping dispatcher: a short-lived listener bound to exactly one
//! port, serving exactly one datagram for exactly one session before
//! closing.

use std::sync::Arc;
use std::time::Duration;

use hopwire_crypto::aead;
use hopwire_proto::packet::{PacketType, SecurePacket};
use hopwire_proto::DataMessage;
use hopwire_session::{Session, SessionRegistry};
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Hard receive deadline for a single dispatcher, per `spec.md` §4.5.
pub const DISPATCH_DEADLINE: Duration = Duration::from_secs(120);

/// Bind a fresh socket on `(host, port)`, wait for exactly one datagram (or
/// the deadline), and process it. On success, hands off to the reply
/// emitter and schedules the next dispatcher on the client-declared port;
/// on any failure the session is left untouched and no next dispatcher runs.
pub async fn run_dispatcher(host: String, port: u16, registry: Arc<SessionRegistry>) {
    let addr = format!("{host}:{port}");
    let socket = match UdpSocket::bind(&addr).await {
        Ok(s) => s,
        Err(e) => {
            warn!(%addr, error = %e, "dispatcher failed to bind port");
            return;
        }
    };

    let mut buf = vec![0u8; 2048];
    let received = tokio::time::timeout(DISPATCH_DEADLINE, socket.recv_from(&mut buf)).await;

    let (len, peer) = match received {
        Ok(Ok(v)) => v,
        Ok(Err(e)) => {
            debug!(%addr, error = %e, "dispatcher read failed");
            return;
        }
        Err(_) => {
            debug!(%addr, "dispatcher timed out waiting for expected packet");
            return;
        }
    };

    if let Err(reason) = handle_datagram(&buf[..len], peer, &registry, &host).await {
        debug!(%addr, %peer, %reason, "dispatcher dropped packet");
    }
}

async fn handle_datagram(
    bytes: &[u8],
    peer: std::net::SocketAddr,
    registry: &Arc<SessionRegistry>,
    host: &str,
) -> Result<(), String> {
    let packet = SecurePacket::from_bytes(bytes).map_err(|e| e.to_string())?;
    if packet.header.packet_type != PacketType::Data {
        return Err(format!("expected Data packet, got {:?}", packet.header.packet_type));
    }

    let (session, plaintext) = trial_decrypt(&packet, registry)
        .await
        .ok_or_else(|| "no known session decrypted this packet".to_string())?;

    let msg = DataMessage::from_json(&plaintext).map_err(|e| e.to_string())?;

    session
        .recv_validate(bytes, packet.header.prev_hash, msg.seq)
        .map_err(|e| e.to_string())?;

    if !msg.message.is_empty() {
        tracing::info!(session_id = %session.session_id, seq = msg.seq, from = %peer, "received application message");
    }

    crate::reply::send_reply(&session, msg.seq, &msg.return_addr)
        .await
        .map_err(|e| e.to_string())?;

    let registry = registry.clone();
    let host = host.to_string();
    let next_port = msg.next_port;
    tokio::spawn(async move {
        run_dispatcher(host, next_port, registry).await;
    });

    Ok(())
}

/// Attempt AEAD decryption of `packet` against every known session's key.
/// The wire format carries no plaintext session identifier by design (see
/// `DESIGN.md` Open Question 5) - the first session whose key successfully
/// authenticates the packet is the sender's session.
async fn trial_decrypt(
    packet: &SecurePacket,
    registry: &Arc<SessionRegistry>,
) -> Option<(Arc<Session>, Vec<u8>)> {
    if packet.nonce.len() != aead::NONCE_SIZE {
        return None;
    }
    let mut nonce = [0u8; aead::NONCE_SIZE];
    nonce.copy_from_slice(&packet.nonce);

    for session in registry.snapshot().await {
        if let Ok(plaintext) = aead::decrypt(&session.shared_key, &nonce, &packet.payload) {
            return Some((session, plaintext));
        }
    }
    None
}
