//! Authorized-client store configuration.

use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientStoreConfig {
    /// Which backend holds the authorized-client records.
    pub backend: StoreBackend,
    /// Connection URL, required for the redis backend.
    pub url: Option<Url>,
    /// Key prefix the records live under.
    pub key_prefix: String,
}

impl Default for ClientStoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: None,
            key_prefix: "authorized_client".to_owned(),
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
}
