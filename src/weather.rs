//! The three weather tools and the registry that exposes them.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::api::OpenWeather;
use crate::client::{Upstream, UpstreamError};
use crate::tools::{ToolDefinition, ToolError, ToolHandler, ToolRegistry, ToolResult};

/// Arguments shared by every weather tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CityArgs {
    /// Name of the city, optionally qualified, e.g. "Milan" or "London,GB".
    pub city: String,
}

/// Which upstream lookup a tool performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherOperation {
    CurrentWeather,
    Forecast,
    AirPollution,
}

impl WeatherOperation {
    pub const ALL: [WeatherOperation; 3] = [
        WeatherOperation::CurrentWeather,
        WeatherOperation::Forecast,
        WeatherOperation::AirPollution,
    ];

    pub fn tool_name(&self) -> &'static str {
        match self {
            WeatherOperation::CurrentWeather => "get_current_weather",
            WeatherOperation::Forecast => "get_weather_forecast",
            WeatherOperation::AirPollution => "get_air_pollution",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WeatherOperation::CurrentWeather => "Get the current weather for a city.",
            WeatherOperation::Forecast => "Get 5-day weather forecast for a city.",
            WeatherOperation::AirPollution => "Get air pollution data for a city.",
        }
    }

    /// Noun used in failure messages.
    pub fn label(&self) -> &'static str {
        match self {
            WeatherOperation::CurrentWeather => "weather",
            WeatherOperation::Forecast => "forecast",
            WeatherOperation::AirPollution => "air pollution",
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::for_args::<CityArgs>(self.tool_name(), self.description())
    }
}

/// Tool handler forwarding one [`WeatherOperation`] to OpenWeatherMap.
pub struct WeatherTool<U> {
    operation: WeatherOperation,
    api: Arc<OpenWeather<U>>,
}

impl<U: Upstream> WeatherTool<U> {
    pub fn new(operation: WeatherOperation, api: Arc<OpenWeather<U>>) -> Self {
        Self { operation, api }
    }

    fn parse_args(&self, arguments: Value) -> Result<CityArgs, String> {
        let args: CityArgs = serde_json::from_value(arguments).map_err(|e| e.to_string())?;
        if args.city.trim().is_empty() {
            return Err("city must not be empty".to_string());
        }
        Ok(args)
    }

    async fn forward(&self, city: &str) -> Result<Value, UpstreamError> {
        match self.operation {
            WeatherOperation::CurrentWeather => self.api.current_weather(city).await,
            WeatherOperation::Forecast => self.api.forecast(city).await,
            WeatherOperation::AirPollution => self.api.air_pollution(city).await,
        }
    }

    fn failure_message(&self, city: &str, err: &UpstreamError) -> String {
        match err {
            UpstreamError::CityNotFound(_) => err.to_string(),
            _ => format!("Failed to get {} for {}: {}", self.operation.label(), city, err),
        }
    }
}

#[async_trait]
impl<U: Upstream + 'static> ToolHandler for WeatherTool<U> {
    async fn call(&self, arguments: Value) -> ToolResult {
        let args = match self.parse_args(arguments) {
            Ok(args) => args,
            Err(cause) => {
                return ToolResult::failure(format!(
                    "Invalid arguments for {}: {}",
                    self.operation.tool_name(),
                    cause
                ))
            }
        };

        debug!("Forwarding {} for {}", self.operation.label(), args.city);

        match self.forward(&args.city).await {
            Ok(payload) => ToolResult::success(payload),
            Err(err) => ToolResult::failure(self.failure_message(&args.city, &err)),
        }
    }
}

/// Build the registry holding all three weather tools.
pub fn build_registry<U: Upstream + 'static>(
    api: Arc<OpenWeather<U>>,
) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    for operation in WeatherOperation::ALL {
        registry.register(
            operation.definition(),
            WeatherTool::new(operation, Arc::clone(&api)),
        )?;
    }
    Ok(registry)
}
