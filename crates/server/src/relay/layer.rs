use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::body::Body;
use client_store::AuthorizedClientStore;
use context::Principal;
use http::{Request, Response};
use tower::{BoxError, Layer};

use super::{headers::with_relay_headers, resolve::resolve};

/// Relays the caller's bearer credential to the upstream service.
///
/// The filter reads the authenticated principal off the request extensions,
/// resolves the token to attach and forwards the chain with the rebuilt
/// request. Requests without a usable credential pass through untouched; a
/// failing store lookup fails the chain instead, so the host can tell an
/// absent session apart from a broken store.
#[derive(Clone)]
pub struct TokenRelayLayer {
    store: Arc<dyn AuthorizedClientStore>,
}

impl TokenRelayLayer {
    pub fn new(store: Arc<dyn AuthorizedClientStore>) -> Self {
        Self { store }
    }
}

impl<S> Layer<S> for TokenRelayLayer
where
    S: Send + Clone,
{
    type Service = TokenRelayService<S>;

    fn layer(&self, next: S) -> Self::Service {
        TokenRelayService {
            next,
            layer: self.clone(),
        }
    }
}

#[derive(Clone)]
pub struct TokenRelayService<S> {
    next: S,
    layer: TokenRelayLayer,
}

impl<S, ReqBody> tower::Service<Request<ReqBody>> for TokenRelayService<S>
where
    S: tower::Service<Request<ReqBody>, Response = Response<Body>> + Send + Clone + 'static,
    S::Future: Send,
    S::Error: Into<BoxError> + 'static,
    ReqBody: http_body::Body + Send + 'static,
{
    type Response = Response<Body>;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Response<Body>, BoxError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.next.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let mut next = self.next.clone();
        let store = self.layer.store.clone();

        Box::pin(async move {
            let Some(principal) = req.extensions().get::<Principal>().cloned() else {
                return next.call(req).await.map_err(Into::into);
            };

            // The chain continues only once the lookup has resolved; dropping
            // the request mid-lookup abandons it without reaching the chain.
            match resolve(&principal, store.as_ref()).await? {
                Some(token) => {
                    log::debug!("Relaying bearer credential to the upstream");

                    let req = with_relay_headers(req, &token)?;
                    next.call(req).await.map_err(Into::into)
                }
                None => next.call(req).await.map_err(Into::into),
            }
        })
    }
}
