//! Endpoint URL parsing for the unified families
//!
//! Swagger 2.0 and OpenAPI 3.0 derive host, schemes, servers and base path
//! from the interface endpoints instead of the request.

use crate::models::{RestInterface, join_paths};
use url::Url;

/// The parts of an endpoint URL the unified builders use
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoint {
    pub scheme: String,
    /// Host with an explicit port, if any (e.g., "localhost:8080")
    pub host: String,
    /// Path of the endpoint, `None` when it is empty or `/`
    pub path: Option<String>,
    /// The endpoint without a trailing slash
    pub url: String,
}

impl Endpoint {
    /// Parse an endpoint; returns `None` when it carries no host
    pub fn parse(endpoint: &str) -> Option<Self> {
        let url = Url::parse(endpoint.trim()).ok()?;
        let host = url.host_str()?;
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let path = match url.path() {
            "" | "/" => None,
            p => Some(join_paths("", p)),
        };
        Some(Self {
            scheme: url.scheme().to_string(),
            host,
            path,
            url: endpoint.trim().trim_end_matches('/').to_string(),
        })
    }
}

/// Parsed endpoints of an interface, in declaration order, skipping unparsable ones
pub(crate) fn endpoints(interface: &RestInterface) -> Vec<Endpoint> {
    interface
        .endpoints
        .iter()
        .filter_map(|e| Endpoint::parse(e))
        .collect()
}
