//! Shared harness for end-to-end gateway tests: a stub upstream that echoes
//! what it received, and a gateway booted from a TOML configuration string.

use std::{collections::BTreeMap, net::SocketAddr, sync::Arc};

use axum::{Json, Router, extract::Request};
use client_store::AuthorizedClientStore;
use config::Config;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the stub upstream saw for one request.
#[derive(Debug, Serialize, Deserialize)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Spawn a stub upstream that answers every request with a JSON echo of it.
pub async fn spawn_upstream() -> SocketAddr {
    spawn(Router::new().fallback(echo)).await
}

async fn echo(request: Request) -> Json<SeenRequest> {
    let (parts, body) = request.into_parts();

    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    Json(SeenRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_owned(),
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// A gateway instance bound to an ephemeral port.
pub struct TestGateway {
    address: SocketAddr,
    client: reqwest::Client,
}

impl TestGateway {
    /// Boot the gateway from a TOML configuration against the given store.
    pub async fn spawn(config: &str, store: Arc<dyn AuthorizedClientStore>) -> Self {
        let config: Config = toml::from_str(config).expect("invalid test configuration");
        let app = server::app(&config, store).expect("failed to build the gateway router");

        Self {
            address: spawn(app).await,
            client: reqwest::Client::new(),
        }
    }

    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, format!("http://{}{path}", self.address))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, path)
    }
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("failed to bind");
    let address = listener.local_addr().expect("listener has no local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server crashed");
    });

    address
}
