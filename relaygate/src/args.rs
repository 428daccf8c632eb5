use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "relaygate", about = "A gateway that relays caller credentials to upstream services")]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "RELAYGATE_CONFIG", default_value = "relaygate.toml")]
    pub config: PathBuf,

    /// Address to listen on, overriding the configuration file
    #[arg(short, long)]
    pub listen_address: Option<SocketAddr>,

    /// Log filter, e.g. "info" or "server=debug,config=debug"
    #[arg(long, env = "RELAYGATE_LOG", default_value = "info")]
    pub log: String,
}
