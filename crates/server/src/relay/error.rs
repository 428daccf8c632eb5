#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("authorized client lookup failed: {0}")]
    Store(#[from] client_store::StoreError),
    #[error("credential cannot be carried in an authorization header")]
    MalformedCredential,
}
