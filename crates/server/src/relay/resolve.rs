use client_store::AuthorizedClientStore;
use context::Principal;
use secrecy::{ExposeSecret, SecretString};

use super::RelayError;

/// Map the authenticated principal to the bearer token to attach, if any.
///
/// A directly presented token is returned as-is; a delegated session is
/// looked up in the authorized-client store. Absence of a credential is a
/// normal outcome, only a failing store surfaces as an error.
pub(super) async fn resolve(
    principal: &Principal,
    store: &dyn AuthorizedClientStore,
) -> Result<Option<SecretString>, RelayError> {
    match principal {
        Principal::Bearer(credential) => Ok(Some(credential.token.clone())),
        Principal::Delegated(session) => {
            let client = store.load(&session.registration_id, &session.subject).await?;

            Ok(client
                .and_then(|client| client.access_token)
                .filter(|token| !token.expose_secret().is_empty()))
        }
        Principal::Other => Ok(None),
    }
}
