#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to bind to address: {0}")]
    Bind(#[source] std::io::Error),

    #[error("Server error: {0}")]
    Server(#[source] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Unknown route filter: {0}")]
    UnknownFilter(String),

    #[error("The redis client store requires a connection URL")]
    StoreUrlMissing,

    #[error("Client store error: {0}")]
    Store(#[from] client_store::StoreError),
}
