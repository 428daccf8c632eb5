use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;

use crate::{AuthorizedClient, AuthorizedClientStore, StoreError};

/// Redis-backed store, for deployments where the identity flow persists
/// sessions out of process.
///
/// Intentionally small: the gateway only ever issues `GET`. Records live at
/// `{prefix}:{registration_id}:{subject}` as a JSON document with an optional
/// `access_token` field.
#[derive(Clone)]
pub struct RedisClientStore {
    manager: redis::aio::ConnectionManager,
    key_prefix: String,
}

/// Wire form of a stored record.
#[derive(Debug, Deserialize)]
struct StoredClient {
    access_token: Option<String>,
}

impl RedisClientStore {
    /// Connect from a URL like `redis://localhost:6379`.
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(|e| StoreError::Connection(e.to_string()))?;

        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            manager,
            key_prefix: key_prefix.into(),
        })
    }

    fn key(&self, registration_id: &str, subject: &str) -> String {
        format!("{}:{registration_id}:{subject}", self.key_prefix)
    }
}

#[async_trait]
impl AuthorizedClientStore for RedisClientStore {
    async fn load(&self, registration_id: &str, subject: &str) -> Result<Option<AuthorizedClient>, StoreError> {
        // The connection manager reconnects on demand; a clone shares the
        // underlying multiplexed connection.
        let mut conn = self.manager.clone();
        let key = self.key(registration_id, subject);

        let raw: Option<String> = redis::cmd("GET")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Lookup(e.to_string()))?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let stored: StoredClient =
            serde_json::from_str(&raw).map_err(|e| StoreError::Lookup(format!("malformed record at '{key}': {e}")))?;

        Ok(Some(AuthorizedClient {
            access_token: stored.access_token.map(SecretString::from),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_with_and_without_token() {
        let stored: StoredClient = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(stored.access_token.as_deref(), Some("abc"));

        let stored: StoredClient = serde_json::from_str("{}").unwrap();
        assert!(stored.access_token.is_none());
    }
}
