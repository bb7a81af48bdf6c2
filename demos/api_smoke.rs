//! Smoke test against the live OpenWeatherMap API, bypassing MCP entirely.
//!
//! ```text
//! OPENWEATHER_API_KEY=... cargo run --example api_smoke
//! ```

use openweather_mcp::{Config, OpenWeather};
use serde_json::Value;

// Formats a numeric or string leaf, or "N/A" when absent.
fn field(value: &Value, pointer: &str) -> String {
    match value.pointer(pointer) {
        Some(Value::String(s)) => s.clone(),
        Some(v) if !v.is_null() => v.to_string(),
        _ => "N/A".to_string(),
    }
}

async fn show_current_weather(api: &OpenWeather, city: &str) {
    match api.current_weather(city).await {
        Ok(data) => {
            println!("Current Weather in {}:", field(&data, "/name"));
            println!("  Temperature: {}°C", field(&data, "/main/temp"));
            println!("  Condition: {}", field(&data, "/weather/0/description"));
            println!("  Humidity: {}%", field(&data, "/main/humidity"));
            println!("  Pressure: {} hPa", field(&data, "/main/pressure"));
        }
        Err(e) => println!("Current weather error: {}", e),
    }
}

async fn show_forecast(api: &OpenWeather, city: &str) {
    match api.forecast(city).await {
        Ok(data) => {
            println!("\n5-Day Forecast for {}:", field(&data, "/city/name"));
            let entries = data
                .get("list")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for item in entries.iter().take(7) {
                println!(
                    "  {}: {}°C, {}",
                    field(item, "/dt_txt"),
                    field(item, "/main/temp"),
                    field(item, "/weather/0/description")
                );
            }
        }
        Err(e) => println!("Forecast error: {}", e),
    }
}

async fn show_air_pollution(api: &OpenWeather, city: &str) {
    match api.air_pollution(city).await {
        Ok(data) => {
            println!("\nAir Pollution in {}:", city);
            println!("  AQI: {} (1=Good, 5=Very Poor)", field(&data, "/list/0/main/aqi"));
            println!("  PM2.5: {} μg/m³", field(&data, "/list/0/components/pm2_5"));
            println!("  PM10: {} μg/m³", field(&data, "/list/0/components/pm10"));
        }
        Err(e) => println!("Air pollution error: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let api = OpenWeather::from_config(&config)?;

    for city in ["Milan", "New York"] {
        println!("\n{}", "=".repeat(50));
        println!("Testing APIs for {}", city);
        println!("{}", "=".repeat(50));

        show_current_weather(&api, city).await;
        show_forecast(&api, city).await;
        show_air_pollution(&api, city).await;
    }

    Ok(())
}
