//! Terminal step of a route's chain: forwards the request to the upstream.

use std::{
    future::Future,
    pin::Pin,
    sync::OnceLock,
    task::{Context, Poll},
    time::Duration,
};

use axum::{body::Body, response::IntoResponse as _};
use http::{Request, Response, StatusCode};
use tower::BoxError;
use url::Url;

/// Forwards requests to one upstream, streaming bodies both ways.
///
/// Method, path, query and body pass through as-is; hop-by-hop headers are
/// dropped. This step never fails the chain itself, an unreachable upstream
/// maps to a gateway error response.
#[derive(Clone)]
pub(crate) struct Proxy {
    client: reqwest::Client,
    upstream: Url,
}

impl Proxy {
    pub(crate) fn new(upstream: Url) -> Self {
        Self {
            client: http_client(),
            upstream,
        }
    }

    fn upstream_url(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.upstream.clone();

        let base = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{base}{path}"));
        url.set_query(query);

        url
    }
}

impl tower::Service<Request<Body>> for Proxy {
    type Response = Response<Body>;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Response<Body>, BoxError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let proxy = self.clone();

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let url = proxy.upstream_url(parts.uri.path(), parts.uri.query());

            let response = insert_proxied_headers_into(proxy.client.request(parts.method, url), &parts.headers)
                .body(reqwest::Body::wrap_stream(body.into_data_stream()))
                .send()
                .await;

            let response = match response {
                Ok(response) => http::Response::from(response).into_response(),
                Err(err) => {
                    log::error!("Failed to reach upstream {}: {err}", proxy.upstream);
                    bad_gateway()
                }
            };

            Ok(response)
        })
    }
}

/// Copies end-to-end headers onto the outbound request. `Content-*` and
/// `Accept-*` headers are forwarded too, the gateway acts as a transparent
/// proxy.
fn insert_proxied_headers_into(mut request: reqwest::RequestBuilder, headers: &http::HeaderMap) -> reqwest::RequestBuilder {
    for (name, value) in headers {
        if not_forwarded(name.as_str()) {
            continue;
        }

        request = request.header(name, value);
    }

    request
}

/// Hop-by-hop headers, plus framing the client recomputes for the re-streamed
/// body.
fn not_forwarded(name: &str) -> bool {
    matches!(
        name,
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "host"
            | "origin"
            | "content-length"
    ) || name.starts_with("sec-websocket-")
}

pub(crate) fn bad_gateway() -> Response<Body> {
    let body = serde_json::json!({ "error": "Bad Gateway" });

    (StatusCode::BAD_GATEWAY, axum::Json(body)).into_response()
}

/// Common HTTP client to re-use as much as possible the same connections.
fn http_client() -> reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .pool_idle_timeout(Some(Duration::from_secs(5)))
                .tcp_nodelay(true)
                .tcp_keepalive(Some(Duration::from_secs(60)))
                .build()
                .expect("Failed to build default HTTP client")
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use http::header;

    use super::*;

    #[test]
    fn upstream_url_joins_path_and_query() {
        let proxy = Proxy::new("http://billing.internal:8080".parse().unwrap());
        let url = proxy.upstream_url("/invoices/1", Some("page=2"));

        assert_eq!(url.as_str(), "http://billing.internal:8080/invoices/1?page=2");
    }

    #[test]
    fn upstream_base_path_is_preserved() {
        let proxy = Proxy::new("http://billing.internal:8080/api/".parse().unwrap());
        let url = proxy.upstream_url("/invoices", None);

        assert_eq!(url.as_str(), "http://billing.internal:8080/api/invoices");
    }

    #[test]
    fn hop_by_hop_headers_are_not_forwarded() {
        let mut headers = http::HeaderMap::new();
        headers.insert(header::CONNECTION, "keep-alive".parse().unwrap());
        headers.insert(header::HOST, "gateway.local".parse().unwrap());
        headers.insert(header::CONTENT_LENGTH, "42".parse().unwrap());
        headers.insert(header::AUTHORIZATION, "Bearer t".parse().unwrap());
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        headers.insert("x-trace-id", "abc".parse().unwrap());

        let client = reqwest::Client::new();
        let request = insert_proxied_headers_into(client.get("http://upstream.local/"), &headers)
            .build()
            .unwrap();

        assert!(request.headers().get(header::CONNECTION).is_none());
        assert!(request.headers().get(header::HOST).is_none());
        assert!(request.headers().get(header::CONTENT_LENGTH).is_none());
        assert_eq!(request.headers()[header::AUTHORIZATION], "Bearer t");
        assert_eq!(request.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(request.headers()["x-trace-id"], "abc");
    }
}
