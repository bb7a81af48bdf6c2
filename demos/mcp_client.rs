//! Drives the weather server through a real MCP client over stdio.
//!
//! ```text
//! OPENWEATHER_API_KEY=... cargo run --example mcp_client -- Milan
//! ```
//!
//! The server is spawned with `cargo run --bin openweather-mcp` unless
//! `OPENWEATHER_MCP_BIN` points at a prebuilt binary.

use std::io::Write;

use openweather_mcp::WeatherToolsClient;
use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
use rmcp::ServiceExt;
use serde_json::json;
use tokio::process::Command;

fn read_city() -> std::io::Result<String> {
    if let Some(city) = std::env::args().nth(1) {
        return Ok(city);
    }
    print!("Enter city name: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn server_command() -> Command {
    match std::env::var("OPENWEATHER_MCP_BIN") {
        Ok(bin) => Command::new(bin),
        Err(_) => Command::new("cargo").configure(|cmd| {
            cmd.args(["run", "--quiet", "--bin", "openweather-mcp"]);
        }),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let city = read_city()?;

    // The child inherits our environment, OPENWEATHER_API_KEY included.
    let transport = TokioChildProcess::new(server_command())?;
    let client = ().serve(transport).await?;

    let tools = client.list_weather_tools().await?;
    println!("Available tools:");
    for tool in &tools {
        println!(
            "  - {}: {}",
            tool.name,
            tool.description.as_deref().unwrap_or_default()
        );
    }

    println!("\n{}\n", "=".repeat(50));

    let result = client
        .call_weather_tool("get_current_weather", json!({ "city": city }))
        .await?;
    println!(
        "Weather result:\n\n {}",
        serde_json::to_string_pretty(&result)?
    );

    client.cancel().await?;
    Ok(())
}
