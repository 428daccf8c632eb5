//! Proxied route definitions.

use serde::Deserialize;
use url::Url;

/// One proxied route: a path prefix, the upstream it forwards to, and the
/// filters applied to its chain.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// Path prefix the route is mounted under, e.g. `/billing`.
    pub path: String,
    /// Base URL of the upstream service.
    pub upstream: Url,
    /// Filter names applied to the route's chain, outermost first.
    #[serde(default)]
    pub filters: Vec<String>,
}
