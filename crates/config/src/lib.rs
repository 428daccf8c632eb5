mod loader;
mod route;
mod server;
mod store;

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

pub use route::RouteConfig;
pub use server::{IdentityConfig, ServerConfig, TlsServerConfig};
pub use store::{ClientStoreConfig, StoreBackend};

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Authorized-client store the relay filter reads delegated tokens from.
    pub client_store: ClientStoreConfig,
    /// Proxied routes, in declaration order.
    pub routes: IndexMap<String, RouteConfig>,
}

impl Config {
    /// Load and validate the configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }
}
