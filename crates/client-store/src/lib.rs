//! Read-only access to the authorized-client records the gateway relays
//! tokens from.
//!
//! The records themselves are owned and written by whatever established the
//! delegated session (an external identity flow); the gateway never writes
//! them, it only loads the current access token for a `(registration,
//! subject)` pair.

mod storage;

use async_trait::async_trait;
use secrecy::SecretString;

pub use storage::{MemoryClientStore, RedisClientStore};

/// The stored state of one delegated session.
///
/// A record can exist without a token, e.g. while the external flow is
/// mid-refresh or after the token was revoked but the session kept.
#[derive(Clone, Debug)]
pub struct AuthorizedClient {
    pub access_token: Option<SecretString>,
}

impl AuthorizedClient {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(SecretString::from(token.into())),
        }
    }

    pub fn without_token() -> Self {
        Self { access_token: None }
    }
}

/// Lookup contract against the external authorized-client store.
///
/// `Ok(None)` means the session is unknown or expired; an `Err` means the
/// backend itself failed. Callers must not collapse the two, absence is a
/// normal outcome while a backend failure is an infrastructure fault.
#[async_trait]
pub trait AuthorizedClientStore: Send + Sync {
    async fn load(&self, registration_id: &str, subject: &str) -> Result<Option<AuthorizedClient>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to connect to the client store backend: {0}")]
    Connection(String),
    #[error("client store lookup failed: {0}")]
    Lookup(String),
}
