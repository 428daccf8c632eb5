use std::sync::Arc;

use async_trait::async_trait;
use client_store::{AuthorizedClient, AuthorizedClientStore, MemoryClientStore, StoreError};
use indoc::formatdoc;
use integration_tests::{SeenRequest, TestGateway, spawn_upstream};

async fn gateway_with(store: Arc<dyn AuthorizedClientStore>) -> TestGateway {
    let upstream = spawn_upstream().await;

    let config = formatdoc! {r#"
        [routes.billing]
        path = "/billing"
        upstream = "http://{upstream}"
        filters = ["token_relay"]
    "#};

    TestGateway::spawn(&config, store).await
}

#[tokio::test]
async fn anonymous_requests_pass_through_unchanged() {
    let gateway = gateway_with(Arc::new(MemoryClientStore::new())).await;

    let seen: SeenRequest = gateway
        .get("/billing/invoices")
        .header("x-trace-id", "abc")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(seen.method, "GET");
    assert_eq!(seen.path, "/invoices");
    assert_eq!(seen.headers.get("x-trace-id").map(String::as_str), Some("abc"));
    assert!(!seen.headers.contains_key("authorization"));
}

#[tokio::test]
async fn bearer_credentials_are_relayed() {
    let gateway = gateway_with(Arc::new(MemoryClientStore::new())).await;

    let seen: SeenRequest = gateway
        .get("/billing/invoices")
        .header("authorization", "Bearer caller-token")
        .header("x-trace-id", "abc")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        seen.headers.get("authorization").map(String::as_str),
        Some("Bearer caller-token")
    );
    assert_eq!(
        seen.headers.get("content-type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(seen.headers.get("x-trace-id").map(String::as_str), Some("abc"));
}

#[tokio::test]
async fn delegated_sessions_relay_the_stored_token() {
    let store = Arc::new(MemoryClientStore::new());
    store.insert("github", "alice", AuthorizedClient::with_token("stored-token"));

    let gateway = gateway_with(store).await;

    let seen: SeenRequest = gateway
        .get("/billing/invoices")
        .header("x-auth-registration", "github")
        .header("x-auth-subject", "alice")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        seen.headers.get("authorization").map(String::as_str),
        Some("Bearer stored-token")
    );
}

#[tokio::test]
async fn unknown_sessions_pass_through_unchanged() {
    let gateway = gateway_with(Arc::new(MemoryClientStore::new())).await;

    let seen: SeenRequest = gateway
        .get("/billing/invoices")
        .header("x-auth-registration", "github")
        .header("x-auth-subject", "nobody")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(!seen.headers.contains_key("authorization"));
}

#[tokio::test]
async fn request_bodies_reach_the_upstream() {
    let gateway = gateway_with(Arc::new(MemoryClientStore::new())).await;

    let seen: SeenRequest = gateway
        .request(reqwest::Method::POST, "/billing/invoices")
        .header("authorization", "Bearer caller-token")
        .body("{\"amount\":42}")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(seen.method, "POST");
    assert_eq!(seen.body, "{\"amount\":42}");
}

#[tokio::test]
async fn a_failing_store_is_a_gateway_error() {
    struct FailingStore;

    #[async_trait]
    impl AuthorizedClientStore for FailingStore {
        async fn load(&self, _: &str, _: &str) -> Result<Option<AuthorizedClient>, StoreError> {
            Err(StoreError::Lookup("connection reset by peer".into()))
        }
    }

    let gateway = gateway_with(Arc::new(FailingStore)).await;

    let response = gateway
        .get("/billing/invoices")
        .header("x-auth-registration", "github")
        .header("x-auth-subject", "alice")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn requests_outside_configured_routes_are_not_found() {
    let gateway = gateway_with(Arc::new(MemoryClientStore::new())).await;

    let response = gateway.get("/unknown").send().await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
