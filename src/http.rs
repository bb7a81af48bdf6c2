//! HTTP client utilities for making requests to the upstream API.

use itertools::Itertools;
use reqwest::{Client, RequestBuilder};

use crate::client::{Query, UpstreamError};
use crate::options::TransportOptions;

/// Build a configured HTTP client from transport options.
pub fn build_http_client(transport_options: &TransportOptions) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .timeout(transport_options.timeout)
        .user_agent(transport_options.user_agent.clone());

    if let Some(proxy_url) = &transport_options.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }

    builder.build()
}

/// Add extra headers to a request if specified in transport options.
pub fn add_extra_headers(
    mut request: RequestBuilder,
    transport_options: &TransportOptions,
) -> RequestBuilder {
    if let Some(h) = &transport_options.headers {
        for (key, value) in h {
            request = request.header(key, value);
        }
    }
    request
}

/// Render a query for logs with the credential masked.
pub fn redact_query(query: &Query) -> String {
    query
        .iter()
        .map(|(key, value)| {
            if key.eq_ignore_ascii_case("appid") {
                format!("{key}=***")
            } else {
                format!("{key}={value}")
            }
        })
        .join("&")
}

/// Extension trait for RequestBuilder that logs the query string.
pub trait RequestBuilderExt {
    /// Attach query parameters and log them. Returns the RequestBuilder for chaining.
    fn query_logged(self, url: &str, query: &Query) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
    fn query_logged(self, url: &str, query: &Query) -> Self {
        tracing::debug!("API request: GET {}?{}", url, redact_query(query));
        self.query(query)
    }
}

/// Extension trait for Response that logs response body.
///
/// Errors carry no URL: the query string holds the API key.
#[async_trait::async_trait]
pub trait ResponseExt {
    /// Get response text and log it. Consumes the response.
    async fn text_logged(self) -> Result<String, reqwest::Error>;

    /// Parse response as JSON and log it. Consumes the response.
    async fn json_logged<T: serde::de::DeserializeOwned>(self) -> Result<T, UpstreamError>;
}

#[async_trait::async_trait]
impl ResponseExt for reqwest::Response {
    async fn text_logged(self) -> Result<String, reqwest::Error> {
        let text = self.text().await.map_err(reqwest::Error::without_url)?;
        tracing::debug!("API response ({} bytes):\n{}", text.len(), text);
        Ok(text)
    }

    async fn json_logged<T: serde::de::DeserializeOwned>(self) -> Result<T, UpstreamError> {
        let bytes = self.bytes().await.map_err(reqwest::Error::without_url)?;

        if let Ok(text) = std::str::from_utf8(&bytes) {
            tracing::debug!("API response ({} bytes):\n{}", text.len(), text);
        }

        serde_json::from_slice(&bytes).map_err(UpstreamError::from)
    }
}
