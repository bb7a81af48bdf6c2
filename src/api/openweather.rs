//! OpenWeatherMap API client implementation.
//!
//! Response bodies are passed through as untyped JSON; only the geocoding
//! result is decoded, because the pollution lookup needs its coordinates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;
use tracing::debug;

use crate::client::{Query, Upstream, UpstreamError};
use crate::config::{ApiKey, Config, ConfigError, Endpoints, Units};
use crate::http::{add_extra_headers, build_http_client, RequestBuilderExt, ResponseExt};
use crate::options::TransportOptions;

/// Error body returned by OpenWeatherMap, e.g. `{"cod":"404","message":"city not found"}`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// One entry of a direct geocoding response.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
    pub state: Option<String>,
}

/// [`Upstream`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    http: reqwest::Client,
    transport_options: TransportOptions,
}

impl HttpUpstream {
    pub fn new(transport_options: TransportOptions) -> Result<Self, reqwest::Error> {
        let http = build_http_client(&transport_options)?;
        Ok(Self {
            http,
            transport_options,
        })
    }

    /// Handle error responses.
    fn handle_error_response(status: reqwest::StatusCode, body: &str) -> UpstreamError {
        let message = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(error_resp) => error_resp.message,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
            Err(_) => body.to_string(),
        };
        UpstreamError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get_json(&self, url: &str, query: &Query) -> Result<Value, UpstreamError> {
        let mut req = self.http.get(url).query_logged(url, query);
        req = add_extra_headers(req, &self.transport_options);

        // The URL carries the API key in its query; keep it out of error text.
        let response = req.send().await.map_err(reqwest::Error::without_url)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text_logged().await.unwrap_or_default();
            return Err(Self::handle_error_response(status, &body));
        }

        response.json_logged().await
    }
}

/// Request forwarder for the three OpenWeatherMap lookups.
///
/// Holds the credential and endpoints; every method performs its upstream
/// calls and hands back the body untouched.
#[derive(Debug, Clone)]
pub struct OpenWeather<U = HttpUpstream> {
    upstream: U,
    api_key: ApiKey,
    endpoints: Endpoints,
    units: Units,
}

impl OpenWeather<HttpUpstream> {
    /// Create a client that talks to the real API.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let upstream = HttpUpstream::new(config.transport.clone())?;
        Ok(Self::new(
            upstream,
            config.api_key.clone(),
            config.endpoints.clone(),
            config.units,
        ))
    }
}

impl<U: Upstream> OpenWeather<U> {
    pub fn new(upstream: U, api_key: ApiKey, endpoints: Endpoints, units: Units) -> Self {
        Self {
            upstream,
            api_key,
            endpoints,
            units,
        }
    }

    // `/weather` and `/forecast` take the key as upper-case `APPID`.
    fn city_query(&self, city: &str) -> Query {
        vec![
            ("q", city.to_string()),
            ("APPID", self.api_key.expose().to_string()),
            ("units", self.units.as_str().to_string()),
        ]
    }

    /// Current conditions for `city`.
    pub async fn current_weather(&self, city: &str) -> Result<Value, UpstreamError> {
        self.upstream
            .get_json(&self.endpoints.weather(), &self.city_query(city))
            .await
    }

    /// 5-day forecast in 3-hour steps for `city`.
    pub async fn forecast(&self, city: &str) -> Result<Value, UpstreamError> {
        self.upstream
            .get_json(&self.endpoints.forecast(), &self.city_query(city))
            .await
    }

    /// Resolve `city` to at most one location.
    pub async fn geocode(&self, city: &str) -> Result<Vec<GeoLocation>, UpstreamError> {
        let query: Query = vec![
            ("q", city.to_string()),
            ("limit", "1".to_string()),
            ("appid", self.api_key.expose().to_string()),
        ];
        let body = self.upstream.get_json(&self.endpoints.geocode(), &query).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Air pollution at explicit coordinates.
    pub async fn air_pollution_at(&self, lat: f64, lon: f64) -> Result<Value, UpstreamError> {
        let query: Query = vec![
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("appid", self.api_key.expose().to_string()),
        ];
        self.upstream
            .get_json(&self.endpoints.air_pollution(), &query)
            .await
    }

    /// Air pollution for `city`: geocode first, then query by coordinates.
    ///
    /// An empty geocoding result short-circuits with
    /// [`UpstreamError::CityNotFound`] and the pollution endpoint is never
    /// called.
    pub async fn air_pollution(&self, city: &str) -> Result<Value, UpstreamError> {
        let location = self
            .geocode(city)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::CityNotFound(city.to_string()))?;

        debug!(
            "Geocoded {} to {} ({}, {})",
            city, location.name, location.lat, location.lon
        );

        self.air_pollution_at(location.lat, location.lon).await
    }
}
