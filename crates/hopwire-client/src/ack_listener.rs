//! Client-side ACK listener: receives server replies on a fixed ephemeral
//! port, validates them against the server-to-client chain, and retires
//! acknowledged entries from the retransmission tracker.

use std::sync::Arc;

use hopwire_crypto::aead;
use hopwire_proto::packet::{PacketType, SecurePacket};
use hopwire_proto::DataMessage;
use hopwire_session::Session;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

/// Read server replies forever. The client has exactly one session key, so
/// there's no trial-decrypt step here unlike the server's dispatcher.
pub async fn run(socket: UdpSocket, session: Arc<Session>) {
    let mut buf = vec![0u8; 2048];
    loop {
        let len = match socket.recv(&mut buf).await {
            Ok(len) => len,
            Err(e) => {
                warn!(error = %e, "ack listener read failed");
                continue;
            }
        };

        if let Err(reason) = handle_reply(&buf[..len], &session) {
            debug!(%reason, "ack listener dropped reply");
        }
    }
}

fn handle_reply(bytes: &[u8], session: &Arc<Session>) -> Result<(), String> {
    let packet = SecurePacket::from_bytes(bytes).map_err(|e| e.to_string())?;
    if packet.header.packet_type != PacketType::Data {
        return Err(format!("expected Data packet, got {:?}", packet.header.packet_type));
    }
    if packet.nonce.len() != aead::NONCE_SIZE {
        return Err("unexpected nonce length".to_string());
    }
    let mut nonce = [0u8; aead::NONCE_SIZE];
    nonce.copy_from_slice(&packet.nonce);

    let plaintext =
        aead::decrypt(&session.shared_key, &nonce, &packet.payload).map_err(|e| e.to_string())?;
    let msg = DataMessage::from_json(&plaintext).map_err(|e| e.to_string())?;

    session
        .recv_validate(bytes, packet.header.prev_hash, msg.seq)
        .map_err(|e| e.to_string())?;

    if let Some(entry) = session.pending.lock().unwrap().remove(&msg.ack_seq) {
        info!(ack_seq = msg.ack_seq, retries = entry.retries, "acknowledged");
    }

    Ok(())
}
