//! Upstream client trait and error types.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Query parameters for a single upstream GET, in the order they are sent.
pub type Query = Vec<(&'static str, String)>;

/// Errors that can occur while talking to the upstream provider.
///
/// None of these ever reach the caller as a fault: the forwarder turns each
/// one into a failure result.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("City {0} not found")]
    CityNotFound(String),
}

impl UpstreamError {
    /// Whether the failure happened before any HTTP status was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, UpstreamError::Transport(_))
    }
}

/// A source of upstream JSON documents.
///
/// The production implementation issues real HTTP requests; tests substitute
/// a recording mock.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Issue a GET against `url` with `query` and parse the body as JSON.
    async fn get_json(&self, url: &str, query: &Query) -> Result<Value, UpstreamError>;
}
