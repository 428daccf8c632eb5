use std::path::Path;

use anyhow::bail;
use indoc::indoc;

use crate::{Config, StoreBackend};

pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let config: Config = toml::from_str(&content)?;

    validate_has_routes(&config)?;
    validate_routes(&config)?;
    validate_client_store(&config)?;

    Ok(config)
}

pub(crate) fn validate_has_routes(config: &Config) -> anyhow::Result<()> {
    if !config.routes.is_empty() {
        return Ok(());
    }

    bail!(indoc! {r#"
        No routes configured. Relaygate requires at least one route to forward requests to.

        Example configuration:

          [routes.billing]
          path = "/billing"
          upstream = "http://billing.internal:8080"
          filters = ["token_relay"]
    "#});
}

pub(crate) fn validate_routes(config: &Config) -> anyhow::Result<()> {
    for (name, route) in &config.routes {
        if !route.path.starts_with('/') {
            bail!("Route '{name}' path must start with '/', got '{}'", route.path);
        }

        if route.path == "/" {
            bail!("Route '{name}' cannot be mounted at the root path, use a non-root prefix");
        }

        if route.path.len() > 1 && route.path.ends_with('/') {
            bail!("Route '{name}' path must not end with '/', got '{}'", route.path);
        }

        if !matches!(route.upstream.scheme(), "http" | "https") {
            bail!(
                "Route '{name}' upstream must be an http(s) URL, got '{}'",
                route.upstream
            );
        }
    }

    Ok(())
}

pub(crate) fn validate_client_store(config: &Config) -> anyhow::Result<()> {
    if config.client_store.backend == StoreBackend::Redis && config.client_store.url.is_none() {
        bail!(indoc! {r#"
            The redis client store backend requires a connection URL.

            Example configuration:

              [client_store]
              backend = "redis"
              url = "redis://localhost:6379"
        "#});
    }

    Ok(())
}
