//! Transport configuration for upstream HTTP requests.

use std::collections::HashMap;
use std::time::Duration;

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every upstream request.
pub const USER_AGENT: &str = concat!("openweather-mcp/", env!("CARGO_PKG_VERSION"));

/// Transport configuration options.
///
/// Controls how requests are sent to the upstream provider. Every request is
/// bounded by `timeout`; failed requests are never retried.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// HTTP proxy URL.
    pub proxy: Option<String>,
    /// Additional HTTP headers to send with every request.
    pub headers: Option<HashMap<String, String>>,
    pub user_agent: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            headers: None,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl TransportOptions {
    /// Create new default transport options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Set the proxy.
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy = Some(proxy_url.into());
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
