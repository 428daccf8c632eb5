//! Maps trusted identity assertions on the inbound request into a
//! [`Principal`] extension.
//!
//! The gateway sits behind a perimeter that has already authenticated the
//! caller; this layer only translates what the perimeter asserts into the
//! principal the relay filter dispatches on. Nothing is validated here.

use std::{
    sync::Arc,
    task::{Context, Poll},
};

use config::IdentityConfig;
use context::{BearerCredential, DelegatedSession, Principal};
use http::{HeaderMap, Request, header};
use tower::Layer;

#[derive(Clone)]
pub struct IdentityLayer {
    config: Arc<IdentityConfig>,
}

impl IdentityLayer {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for IdentityLayer {
    type Service = IdentityService<S>;

    fn layer(&self, next: S) -> Self::Service {
        IdentityService {
            next,
            config: self.config.clone(),
        }
    }
}

#[derive(Clone)]
pub struct IdentityService<S> {
    next: S,
    config: Arc<IdentityConfig>,
}

impl<S, ReqBody> tower::Service<Request<ReqBody>> for IdentityService<S>
where
    S: tower::Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.next.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        if let Some(principal) = principal_from_headers(&self.config, req.headers()) {
            req.extensions_mut().insert(principal);
        }

        self.next.call(req)
    }
}

fn principal_from_headers(config: &IdentityConfig, headers: &HeaderMap) -> Option<Principal> {
    // A directly presented token wins over delegated-session assertions.
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
    {
        return Some(Principal::Bearer(BearerCredential::new(token)));
    }

    let registration = header_value(headers, &config.registration_header);
    let subject = header_value(headers, &config.subject_header);

    if let (Some(registration), Some(subject)) = (registration, subject) {
        return Some(Principal::Delegated(DelegatedSession::new(registration, subject)));
    }

    if headers.contains_key(config.marker_header.as_str()) {
        return Some(Principal::Other);
    }

    None
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
