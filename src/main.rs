use std::sync::Arc;

use openweather_mcp::{build_registry, Config, OpenWeather, WeatherServer};
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr; stdout carries MCP frames only.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("openweather_mcp=info,rmcp=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::from_env()?;
    let api = Arc::new(OpenWeather::from_config(&config)?);
    let registry = build_registry(api)?;

    info!(
        "Starting weather MCP server (stdio) with {} tools, base {}",
        registry.len(),
        config.endpoints.base_url
    );

    let service = WeatherServer::new(registry).serve(stdio()).await?;
    service.waiting().await?;

    info!("Client disconnected, shutting down");
    Ok(())
}
