use secrecy::SecretString;

/// The authenticated identity of the caller for the current request.
///
/// Populated into the request extensions by the identity layer and read by
/// the token relay filter. Dispatch over the variants is always an exhaustive
/// `match`, so adding a variant forces a decision at every call site.
#[derive(Clone, Debug)]
pub enum Principal {
    /// The caller presented a complete, ready-to-forward bearer token.
    Bearer(BearerCredential),
    /// The caller's session was established through an external identity
    /// provider; the current token has to be looked up.
    Delegated(DelegatedSession),
    /// Authenticated through a mechanism the relay does not recognize.
    Other,
}

/// An opaque bearer token supplied by the caller itself.
#[derive(Clone, Debug)]
pub struct BearerCredential {
    pub token: SecretString,
}

impl BearerCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }
}

/// A delegated third-party session. Carries no token value, only the key
/// under which the authorized-client store tracks the current one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegatedSession {
    /// Which identity provider registration established the session.
    pub registration_id: String,
    /// Which end user the session belongs to.
    pub subject: String,
}

impl DelegatedSession {
    pub fn new(registration_id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            registration_id: registration_id.into(),
            subject: subject.into(),
        }
    }
}
