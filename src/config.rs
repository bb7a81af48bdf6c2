//! Startup configuration loaded from the process environment.
//!
//! Everything here is resolved once, before the server accepts its first
//! request. A missing API key is fatal: [`Config::from_env`] fails and no
//! tools are ever registered.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::options::TransportOptions;

pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const BASE_URL_VAR: &str = "OPENWEATHER_BASE_URL";
pub const GEO_URL_VAR: &str = "OPENWEATHER_GEO_URL";
pub const UNITS_VAR: &str = "OPENWEATHER_UNITS";
pub const TIMEOUT_VAR: &str = "OPENWEATHER_TIMEOUT_SECS";
pub const PROXY_VAR: &str = "OPENWEATHER_PROXY";

pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_URL: &str = "http://api.openweathermap.org/geo/1.0";

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENWEATHER_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("Invalid units '{0}': expected metric, imperial or standard")]
    InvalidUnits(String),

    #[error("Invalid OPENWEATHER_TIMEOUT_SECS '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// The OpenWeatherMap API key.
///
/// Never printed: `Debug` is redacted so the key cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting empty or blank values.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Unit system requested from the weather and forecast endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }
}

impl FromStr for Units {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(ConfigError::InvalidUnits(s.to_string())),
        }
    }
}

/// Upstream base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Base for `/weather`, `/forecast` and `/air_pollution`.
    pub base_url: String,
    /// Base for the geocoding `/direct` lookup.
    pub geo_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            geo_url: DEFAULT_GEO_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point both bases at a single host, e.g. a local test server.
    pub fn with_root(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        Self {
            base_url: format!("{root}/data/2.5"),
            geo_url: format!("{root}/geo/1.0"),
        }
    }

    pub fn weather(&self) -> String {
        format!("{}/weather", self.base_url)
    }

    pub fn forecast(&self) -> String {
        format!("{}/forecast", self.base_url)
    }

    pub fn air_pollution(&self) -> String {
        format!("{}/air_pollution", self.base_url)
    }

    pub fn geocode(&self) -> String {
        format!("{}/direct", self.geo_url)
    }
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub endpoints: Endpoints,
    pub units: Units,
    pub transport: TransportOptions,
}

impl Config {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            endpoints: Endpoints::default(),
            units: Units::default(),
            transport: TransportOptions::default(),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .ok_or(ConfigError::MissingApiKey)
            .and_then(ApiKey::new)?;

        let mut config = Config::new(api_key);

        if let Some(base_url) = non_empty(lookup(BASE_URL_VAR)) {
            config.endpoints.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(geo_url) = non_empty(lookup(GEO_URL_VAR)) {
            config.endpoints.geo_url = geo_url.trim_end_matches('/').to_string();
        }
        if let Some(units) = non_empty(lookup(UNITS_VAR)) {
            config.units = units.parse()?;
        }
        if let Some(raw) = non_empty(lookup(TIMEOUT_VAR)) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config.transport = config.transport.with_timeout(Duration::from_secs(secs));
        }
        if let Some(proxy) = non_empty(lookup(PROXY_VAR)) {
            config.transport = config.transport.with_proxy(proxy);
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
