use async_trait::async_trait;
use dashmap::DashMap;

use crate::{AuthorizedClient, AuthorizedClientStore, StoreError};

/// In-process store keyed by `(registration_id, subject)`.
///
/// The default backend. Sessions are seeded through [`MemoryClientStore::insert`],
/// typically by tests or by an embedding host that manages its own sessions.
#[derive(Debug, Default)]
pub struct MemoryClientStore {
    clients: DashMap<(String, String), AuthorizedClient>,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, registration_id: impl Into<String>, subject: impl Into<String>, client: AuthorizedClient) {
        self.clients.insert((registration_id.into(), subject.into()), client);
    }
}

#[async_trait]
impl AuthorizedClientStore for MemoryClientStore {
    async fn load(&self, registration_id: &str, subject: &str) -> Result<Option<AuthorizedClient>, StoreError> {
        let key = (registration_id.to_owned(), subject.to_owned());

        Ok(self.clients.get(&key).map(|entry| entry.value().clone()))
    }
}
