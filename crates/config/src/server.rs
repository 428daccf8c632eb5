//! HTTP server configuration settings.

use std::{net::SocketAddr, path::PathBuf};

use serde::Deserialize;

/// HTTP server configuration settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// The socket address the server should listen on.
    pub listen_address: Option<SocketAddr>,
    /// TLS configuration for secure connections.
    pub tls: Option<TlsServerConfig>,
    /// How the identity layer reads trusted identity assertions off the
    /// inbound request.
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlsServerConfig {
    pub certificate: PathBuf,
    pub key: PathBuf,
}

/// Header names a perimeter auth component uses to assert the caller's
/// identity. The gateway trusts these as-is; validating them is the
/// perimeter's job.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    /// Header naming the identity-provider registration of a delegated
    /// session.
    pub registration_header: String,
    /// Header naming the end user of a delegated session.
    pub subject_header: String,
    /// Header marking a request as authenticated by some other mechanism.
    pub marker_header: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            registration_header: "x-auth-registration".to_owned(),
            subject_header: "x-auth-subject".to_owned(),
            marker_header: "x-auth-principal".to_owned(),
        }
    }
}
