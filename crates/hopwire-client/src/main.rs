mod ack_listener;
mod handshake;
mod port_selector;
mod retransmit;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hopwire_common::{Config, DEFAULT_CONFIG_PATH};
use hopwire_crypto::aead;
use hopwire_proto::packet::SecurePacket;
use hopwire_proto::DataMessage;
use hopwire_session::Pending;
use port_selector::PortSelector;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UdpSocket;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "hopwire-client", about = "hopwire port-hopping secure datagram client")]
struct Args {
    /// Path to the JSON configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hopwire_common::init_tracing();

    let args = Args::parse();
    let config = Config::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    let target = config.require_client_target_address()?.to_string();

    let target_host = target
        .rsplit_once(':')
        .map(|(host, _)| host.to_string())
        .with_context(|| format!("client_target_address {target} must be host:port"))?;

    let handshake_socket = UdpSocket::bind("0.0.0.0:0").await?;
    handshake_socket
        .connect(format!("{target_host}:{}", config.handshake_port))
        .await
        .context("connecting handshake socket")?;

    let session = handshake::perform(&handshake_socket).await?;

    let ack_socket = UdpSocket::bind("0.0.0.0:0").await?;
    let return_addr = ack_socket.local_addr()?.to_string();
    info!(%return_addr, "ack listener bound");

    tokio::spawn(ack_listener::run(ack_socket, session.clone()));
    tokio::spawn(retransmit::run(session.clone()));

    let port_selector = PortSelector::new(config.port_hopping.start, config.port_hopping.end);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            continue;
        }

        let destination_port = session
            .current_port()
            .context("client session has no destination port")?;
        let next_port = port_selector.next_port();

        let (seq, prev_hash) = session.send_prepare();
        let msg = DataMessage {
            session_id: session.session_id.to_string(),
            message: line.into_bytes(),
            next_port,
            seq,
            ack_seq: session.last_acked_seq(),
            return_addr: return_addr.clone(),
        };

        let plaintext = msg.to_json()?;
        let nonce = aead::generate_nonce();
        let ciphertext = aead::encrypt(&session.shared_key, &nonce, &plaintext)
            .map_err(|_| anyhow::anyhow!("encrypting outgoing message failed"))?;
        let packet = SecurePacket::data(prev_hash, nonce.to_vec(), ciphertext);
        let bytes = packet.to_bytes();

        session.send_commit(&bytes);
        session
            .pending
            .lock()
            .unwrap()
            .insert(seq, Pending::new(bytes.clone()));

        let send_socket = UdpSocket::bind("0.0.0.0:0").await?;
        let destination = format!("{target_host}:{destination_port}");
        match send_socket.send_to(&bytes, &destination).await {
            Ok(_) => {
                session.set_current_port(next_port);
            }
            Err(e) => {
                session.pending.lock().unwrap().remove(&seq);
                warn!(%destination, error = %e, "send failed; dropped pending entry");
            }
        }
    }

    Ok(())
}
