//! Proxy sessions and platform endpoints.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::config::{API_BASE_URL, GRAPHQL_QUERY_PATH, PLATFORM_BASE_URL, PROFILE_INFO_PATH};

/// Platform endpoints a session talks to.
///
/// Injectable so tests can point the pipeline at a local mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// GraphQL query endpoint (post POST and timeline GET)
    pub graphql_query: Url,
    /// Profile info endpoint
    pub profile_info: Url,
}

impl Endpoints {
    /// Resolves every endpoint against a single base URL.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if a path cannot be joined onto `base`.
    pub fn with_base_url(base: &Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            graphql_query: base.join(GRAPHQL_QUERY_PATH)?,
            profile_info: base.join(PROFILE_INFO_PATH)?,
        })
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        // Constants are fixed and known to parse
        let platform = Url::parse(PLATFORM_BASE_URL).expect("valid platform base URL");
        let api = Url::parse(API_BASE_URL).expect("valid API base URL");
        Self {
            graphql_query: platform
                .join(GRAPHQL_QUERY_PATH)
                .expect("valid GraphQL endpoint"),
            profile_info: api.join(PROFILE_INFO_PATH).expect("valid profile endpoint"),
        }
    }
}

/// An outbound network session bound to one egress identity.
///
/// Owned by exactly one batch (or one timeline page) and dropped when that
/// unit of work completes; sessions are never reused across rounds.
pub struct ProxySession {
    id: u64,
    client: reqwest::Client,
    endpoints: Arc<Endpoints>,
    proxy_label: Option<String>,
}

impl fmt::Debug for ProxySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxySession")
            .field("id", &self.id)
            .field("proxy", &self.proxy_label)
            .finish_non_exhaustive()
    }
}

impl ProxySession {
    pub fn new(
        id: u64,
        client: reqwest::Client,
        endpoints: Arc<Endpoints>,
        proxy: Option<&Url>,
    ) -> Self {
        Self {
            id,
            client,
            endpoints,
            proxy_label: proxy.map(redact_proxy),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// `host:port` of the egress proxy, or `direct`.
    pub fn label(&self) -> &str {
        self.proxy_label.as_deref().unwrap_or("direct")
    }
}

/// Strips credentials and path from a proxy URL for logging.
pub fn redact_proxy(url: &Url) -> String {
    match (url.host_str(), url.port_or_known_default()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        _ => "[proxy]".to_string(),
    }
}
