//! # openweather-mcp
//!
//! An MCP server exposing three OpenWeatherMap lookups as tools:
//! `get_current_weather`, `get_weather_forecast` and `get_air_pollution`.
//!
//! ## Architecture
//!
//! 1. **Config** is read once from the environment; a missing
//!    `OPENWEATHER_API_KEY` aborts startup.
//! 2. **OpenWeather** forwards each lookup to the upstream REST API through
//!    an [`Upstream`] implementation and returns the body untouched.
//! 3. **ToolRegistry** maps tool names to definitions and handlers. It is
//!    built explicitly at startup and never mutated afterwards.
//! 4. **WeatherServer** serves the registry over MCP (stdio in the shipped
//!    binary).
//!
//! Every invocation yields exactly one [`ToolResult`]: the upstream JSON on
//! success, or `{"error": "..."}` on any failure.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use openweather_mcp::{build_registry, Config, OpenWeather, ToolInvocation};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let api = Arc::new(OpenWeather::from_config(&config)?);
//!     let registry = build_registry(api)?;
//!
//!     let mut args = serde_json::Map::new();
//!     args.insert("city".into(), "Milan".into());
//!     let result = registry
//!         .call(ToolInvocation::new("get_current_weather", args))
//!         .await?;
//!     println!("{}", result.into_value());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod http;
pub mod mcp;
pub mod options;
pub mod tools;
pub mod weather;

pub use api::{GeoLocation, HttpUpstream, OpenWeather};
pub use client::{Query, Upstream, UpstreamError};
pub use config::{ApiKey, Config, ConfigError, Endpoints, Units};
pub use mcp::{decode_call_result, SessionError, WeatherServer, WeatherToolsClient};
pub use options::TransportOptions;
pub use tools::{ToolDefinition, ToolError, ToolHandler, ToolInvocation, ToolRegistry, ToolResult};
pub use weather::{build_registry, CityArgs, WeatherOperation, WeatherTool};

// Re-export rmcp for convenience
pub use rmcp;
