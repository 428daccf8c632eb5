//! Named filters routes attach to their chains.
//!
//! Route configuration refers to filters by name only, filters take no
//! per-route parameters. Their dependencies are injected here once, at
//! startup.

use std::sync::Arc;

use axum::body::Body;
use client_store::AuthorizedClientStore;
use http::{Request, Response};
use tower::{BoxError, Layer, util::BoxCloneSyncService};

use crate::{error::Error, relay::TokenRelayLayer};

/// A route's chain, type-erased so filters can stack in configuration order.
pub(crate) type RouteChain = BoxCloneSyncService<Request<Body>, Response<Body>, BoxError>;

/// Constructs filters by their configured name.
pub(crate) struct FilterRegistry {
    store: Arc<dyn AuthorizedClientStore>,
}

impl FilterRegistry {
    pub(crate) fn new(store: Arc<dyn AuthorizedClientStore>) -> Self {
        Self { store }
    }

    pub(crate) fn get(&self, name: &str) -> Result<RouteFilter, Error> {
        match name {
            "token_relay" => Ok(RouteFilter::TokenRelay(TokenRelayLayer::new(self.store.clone()))),
            _ => Err(Error::UnknownFilter(name.to_owned())),
        }
    }
}

/// One constructed filter instance.
#[derive(Clone)]
pub(crate) enum RouteFilter {
    TokenRelay(TokenRelayLayer),
}

impl std::fmt::Debug for RouteFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteFilter::TokenRelay(_) => f.write_str("TokenRelay"),
        }
    }
}

impl RouteFilter {
    pub(crate) fn wrap(&self, next: RouteChain) -> RouteChain {
        match self {
            RouteFilter::TokenRelay(layer) => BoxCloneSyncService::new(layer.layer(next)),
        }
    }
}
