mod error;
mod filters;
mod identity;
pub mod logger;
mod proxy;
mod relay;

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, body::Body, error_handling::HandleErrorLayer};
use axum_server::tls_rustls::RustlsConfig;
use client_store::{AuthorizedClientStore, MemoryClientStore, RedisClientStore};
use config::{ClientStoreConfig, Config, StoreBackend};
use filters::FilterRegistry;
use http::Response;
use proxy::Proxy;
use tokio::net::TcpListener;
use tower::{BoxError, ServiceBuilder, util::BoxCloneSyncService};

pub use error::Error;
pub use identity::IdentityLayer;
pub use relay::{RelayError, TokenRelayLayer, TokenRelayService};

pub(crate) type Result<T> = std::result::Result<T, error::Error>;

pub struct ServeConfig {
    pub listen_address: SocketAddr,
    pub config: Config,
}

/// Construct the authorized-client store the configuration asks for.
pub async fn client_store(config: &ClientStoreConfig) -> Result<Arc<dyn AuthorizedClientStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryClientStore::new())),
        StoreBackend::Redis => {
            let url = config.url.as_ref().ok_or(Error::StoreUrlMissing)?;
            let store = RedisClientStore::connect(url.as_str(), config.key_prefix.clone()).await?;

            Ok(Arc::new(store))
        }
    }
}

/// Build the gateway router.
///
/// Every configured route becomes a proxied chain with its filters applied in
/// declaration order, nested under the route's path prefix. The identity
/// layer wraps the whole router so every chain sees the caller's principal.
pub fn app(config: &Config, store: Arc<dyn AuthorizedClientStore>) -> Result<Router> {
    let registry = FilterRegistry::new(store);
    let mut router = Router::new();

    for (name, route) in &config.routes {
        let mut chain: filters::RouteChain = BoxCloneSyncService::new(Proxy::new(route.upstream.clone()));

        // First configured filter sees the request first.
        for filter_name in route.filters.iter().rev() {
            chain = registry.get(filter_name)?.wrap(chain);
        }

        let service = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(chain_failed))
            .service(chain);

        log::info!("Route {name}: {} -> {}", route.path, route.upstream);
        router = router.nest_service(&route.path, service);
    }

    Ok(router.layer(IdentityLayer::new(config.server.identity.clone())))
}

/// Host-side boundary for a failed filter chain: the request fails with a
/// gateway error and the fault is logged. Retry policy, if any, lives with
/// the caller.
async fn chain_failed(err: BoxError) -> Response<Body> {
    log::error!("Request filter chain failed: {err}");

    proxy::bad_gateway()
}

pub async fn serve(ServeConfig { listen_address, config }: ServeConfig) -> Result<()> {
    let store = client_store(&config.client_store).await?;
    let app = app(&config, store)?;

    let listener = TcpListener::bind(listen_address).await.map_err(Error::Bind)?;

    match &config.server.tls {
        Some(tls) => {
            let rustls_config = RustlsConfig::from_pem_file(&tls.certificate, &tls.key)
                .await
                .map_err(|e| Error::Tls(e.to_string()))?;

            log::info!("Listening on https://{listen_address}");

            let std_listener = listener.into_std().map_err(Error::Bind)?;

            axum_server::from_tcp_rustls(std_listener, rustls_config)
                .serve(app.into_make_service())
                .await
                .map_err(Error::Server)?;
        }
        None => {
            log::info!("Listening on http://{listen_address}");

            axum::serve(listener, app).await.map_err(Error::Server)?;
        }
    }

    Ok(())
}
