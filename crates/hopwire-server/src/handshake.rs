//! Server-side handshake: accepts the client's ephemeral public key, derives
//! the shared secret, allocates a session and its first port, and spawns the
//! first dispatcher.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use hopwire_crypto::x25519;
use hopwire_proto::packet::{PacketType, SecurePacket};
use hopwire_session::{PortManager, Session, SessionId, SessionRegistry};
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};
use zeroize::Zeroize;

/// Expected length of a handshake payload: a raw X25519 public key.
const HANDSHAKE_PAYLOAD_LEN: usize = x25519::KEY_SIZE;

/// Run the handshake acceptor loop on `socket` forever.
///
/// Each accepted handshake spawns its own dispatcher chain; malformed
/// handshakes are dropped silently, per `spec.md` §4.3's "Failure" clause.
pub async fn accept_loop(
    socket: UdpSocket,
    registry: Arc<SessionRegistry>,
    port_manager: Arc<PortManager>,
    listen_host: String,
) -> anyhow::Result<()> {
    let mut buf = vec![0u8; 2048];
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "handshake socket read failed");
                continue;
            }
        };

        if let Err(e) = handle_handshake(
            &socket,
            &buf[..len],
            peer,
            &registry,
            &port_manager,
            &listen_host,
        )
        .await
        {
            debug!(error = %e, %peer, "dropped malformed or failed handshake");
        }
    }
}

async fn handle_handshake(
    socket: &UdpSocket,
    bytes: &[u8],
    peer: SocketAddr,
    registry: &Arc<SessionRegistry>,
    port_manager: &Arc<PortManager>,
    listen_host: &str,
) -> anyhow::Result<()> {
    let packet = SecurePacket::from_bytes(bytes).context("framing error on handshake packet")?;
    if packet.header.packet_type != PacketType::Handshake {
        anyhow::bail!("expected Handshake packet, got {:?}", packet.header.packet_type);
    }
    if packet.payload.len() != HANDSHAKE_PAYLOAD_LEN {
        anyhow::bail!(
            "handshake payload must be {} bytes, got {}",
            HANDSHAKE_PAYLOAD_LEN,
            packet.payload.len()
        );
    }

    let mut client_pub = [0u8; HANDSHAKE_PAYLOAD_LEN];
    client_pub.copy_from_slice(&packet.payload);

    let (mut server_priv, server_pub) = x25519::generate_keypair();
    let shared_key = x25519::shared_secret(&server_priv, &client_pub);
    server_priv.zeroize();

    let session_id = SessionId::generate();
    let first_port = port_manager.next_port();

    let mut reply_payload = Vec::with_capacity(HANDSHAKE_PAYLOAD_LEN + 2 + 32);
    reply_payload.extend_from_slice(&server_pub);
    reply_payload.extend_from_slice(&first_port.to_be_bytes());
    reply_payload.extend_from_slice(session_id.to_string().as_bytes());

    let reply = SecurePacket::handshake(reply_payload);
    socket
        .send_to(&reply.to_bytes(), peer)
        .await
        .context("sending handshake reply")?;

    let session = Arc::new(Session::new(session_id, shared_key));
    registry.insert(session).await;

    info!(%session_id, %peer, first_port, "handshake accepted");

    let dispatcher_registry = registry.clone();
    let dispatcher_host = listen_host.to_string();
    tokio::spawn(async move {
        crate::dispatcher::run_dispatcher(dispatcher_host, first_port, dispatcher_registry).await;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopwire_crypto::x25519;

    #[tokio::test]
    async fn handshake_allocates_session_and_first_port() {
        let server_socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server_socket.local_addr().unwrap();
        let client_socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let (client_priv, client_pub) = x25519::generate_keypair();
        let request = SecurePacket::handshake(client_pub.to_vec());
        client_socket
            .send_to(&request.to_bytes(), server_addr)
            .await
            .unwrap();

        let mut buf = vec![0u8; 2048];
        let (len, peer) = server_socket.recv_from(&mut buf).await.unwrap();

        let registry = Arc::new(SessionRegistry::new());
        let port_manager = Arc::new(PortManager::new(40000, 40005));
        handle_handshake(
            &server_socket,
            &buf[..len],
            peer,
            &registry,
            &port_manager,
            "127.0.0.1",
        )
        .await
        .unwrap();

        assert_eq!(registry.len().await, 1);

        let (reply_len, _) = client_socket.recv_from(&mut buf).await.unwrap();
        let reply = SecurePacket::from_bytes(&buf[..reply_len]).unwrap();
        assert_eq!(reply.header.packet_type, PacketType::Handshake);

        let mut server_pub = [0u8; x25519::KEY_SIZE];
        server_pub.copy_from_slice(&reply.payload[0..x25519::KEY_SIZE]);
        let first_port = u16::from_be_bytes([
            reply.payload[x25519::KEY_SIZE],
            reply.payload[x25519::KEY_SIZE + 1],
        ]);
        assert_eq!(first_port, 40000);

        let client_shared_key = x25519::shared_secret(&client_priv, &server_pub);
        let sessions = registry.snapshot().await;
        assert_eq!(sessions[0].shared_key, client_shared_key);
    }

    #[tokio::test]
    async fn rejects_wrong_payload_length() {
        let server_socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let registry = Arc::new(SessionRegistry::new());
        let port_manager = Arc::new(PortManager::new(40000, 40005));

        let bogus = SecurePacket::handshake(vec![0u8; 4]);
        let result = handle_handshake(
            &server_socket,
            &bogus.to_bytes(),
            "127.0.0.1:1".parse().unwrap(),
            &registry,
            &port_manager,
            "127.0.0.1",
        )
        .await;

        assert!(result.is_err());
        assert_eq!(registry.len().await, 0);
    }
}
