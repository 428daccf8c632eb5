use std::net::{Ipv4Addr, SocketAddr};

use args::Args;
use clap::Parser;

mod args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    server::logger::init(&args.log);

    let config = config::Config::load(&args.config)?;

    let listen_address = args
        .listen_address
        .or(config.server.listen_address)
        .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)));

    log::info!("Starting relaygate {}", env!("CARGO_PKG_VERSION"));

    server::serve(server::ServeConfig { listen_address, config }).await?;

    Ok(())
}
