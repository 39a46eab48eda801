//! Client-side handshake: generate an ephemeral keypair, send it to the
//! server's handshake port, and parse the response into a live session.

use std::sync::Arc;

use anyhow::Context;
use hopwire_crypto::x25519;
use hopwire_proto::packet::{PacketType, SecurePacket};
use hopwire_session::{Session, SessionId};
use tokio::net::UdpSocket;
use tracing::info;
use zeroize::Zeroize;

/// Perform the handshake over `socket`, already "connected" (via
/// `connect()`) to the server's handshake address.
pub async fn perform(socket: &UdpSocket) -> anyhow::Result<Arc<Session>> {
    let (mut client_priv, client_pub) = x25519::generate_keypair();

    let request = SecurePacket::handshake(client_pub.to_vec());
    socket
        .send(&request.to_bytes())
        .await
        .context("sending handshake request")?;

    let mut buf = vec![0u8; 2048];
    let len = socket
        .recv(&mut buf)
        .await
        .context("reading handshake response")?;

    let response = SecurePacket::from_bytes(&buf[..len]).context("parsing handshake response")?;
    if response.header.packet_type != PacketType::Handshake {
        anyhow::bail!(
            "expected Handshake response, got {:?}",
            response.header.packet_type
        );
    }

    let payload = &response.payload;
    if payload.len() <= x25519::KEY_SIZE + 2 {
        anyhow::bail!("handshake response payload too short");
    }

    let mut server_pub = [0u8; x25519::KEY_SIZE];
    server_pub.copy_from_slice(&payload[0..x25519::KEY_SIZE]);
    let first_port = u16::from_be_bytes([
        payload[x25519::KEY_SIZE],
        payload[x25519::KEY_SIZE + 1],
    ]);
    let session_id_ascii = std::str::from_utf8(&payload[x25519::KEY_SIZE + 2..])
        .context("session id is not valid UTF-8")?;
    let session_id: SessionId = session_id_ascii
        .parse()
        .context("session id is not valid hex")?;

    let shared_key = x25519::shared_secret(&client_priv, &server_pub);
    client_priv.zeroize();
    let session = Arc::new(Session::new_client(session_id, shared_key, first_port));

    info!(%session_id, first_port, "handshake complete");
    Ok(session)
}
