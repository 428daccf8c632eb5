mod principal;

pub use principal::{BearerCredential, DelegatedSession, Principal};
