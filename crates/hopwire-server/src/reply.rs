//! Server-side reply/ACK emitter. The reply chain is independently chained
//! from the receive direction - it shares only the session's symmetric key,
//! not chain state, with the client-to-server direction.

use hopwire_crypto::aead;
use hopwire_proto::packet::SecurePacket;
use hopwire_proto::{DataMessage, SERVER_REPLY_SESSION_ID};
use hopwire_session::Session;

pub async fn send_reply(session: &Session, ack_seq: u64, return_addr: &str) -> anyhow::Result<()> {
    if return_addr.is_empty() {
        anyhow::bail!("received packet carried no return_addr");
    }

    let (seq, prev_hash) = session.send_prepare();

    let msg = DataMessage {
        session_id: SERVER_REPLY_SESSION_ID.to_string(),
        message: Vec::new(),
        next_port: 0,
        seq,
        ack_seq,
        return_addr: String::new(),
    };
    let plaintext = msg.to_json()?;

    let nonce = aead::generate_nonce();
    let ciphertext = aead::encrypt(&session.shared_key, &nonce, &plaintext)
        .map_err(|_| anyhow::anyhow!("reply encryption failed"))?;

    let packet = SecurePacket::data(prev_hash, nonce.to_vec(), ciphertext);
    let bytes = packet.to_bytes();
    session.send_commit(&bytes);

    let socket = tokio::net::UdpSocket::bind("0.0.0.0:0").await?;
    socket.send_to(&bytes, return_addr).await?;

    Ok(())
}
