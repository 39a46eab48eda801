mod dispatcher;
mod handshake;
mod reply;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hopwire_common::{Config, DEFAULT_CONFIG_PATH};
use hopwire_session::{PortManager, SessionRegistry};
use tokio::net::UdpSocket;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hopwire-server", about = "hopwire port-hopping secure datagram server")]
struct Args {
    /// Path to the JSON configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the server's listen address from the config file.
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hopwire_common::init_tracing();

    let args = Args::parse();
    let config = Config::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    let listen_address = match &args.listen {
        Some(addr) => addr.clone(),
        None => config.require_listen_address()?.to_string(),
    };

    let host = listen_address
        .rsplit_once(':')
        .map(|(host, _)| host.to_string())
        .unwrap_or_else(|| listen_address.clone());

    let handshake_addr = format!("{host}:{}", config.handshake_port);
    let socket = UdpSocket::bind(&handshake_addr)
        .await
        .with_context(|| format!("binding handshake socket on {handshake_addr}"))?;

    info!(%handshake_addr, "hopwire-server listening for handshakes");

    let registry = Arc::new(SessionRegistry::new());
    let port_manager = Arc::new(PortManager::new(
        config.port_hopping.start,
        config.port_hopping.end,
    ));

    handshake::accept_loop(socket, registry, port_manager, host).await
}
