mod common;

use common::{api, endpoints, query_value, MockUpstream, Reply, API_KEY};
use openweather_mcp::{build_registry, ToolInvocation, ToolRegistry, ToolResult};
use serde_json::{json, Map, Value};

fn city(name: &str) -> Map<String, Value> {
    let mut args = Map::new();
    args.insert("city".to_string(), json!(name));
    args
}

fn registry(mock: &MockUpstream) -> ToolRegistry {
    build_registry(api(mock)).unwrap()
}

async fn invoke(registry: &ToolRegistry, tool: &str, args: Map<String, Value>) -> ToolResult {
    registry
        .call(ToolInvocation::new(tool, args))
        .await
        .unwrap()
}

fn milan_weather() -> Value {
    json!({
        "name": "Milan",
        "main": {"temp": 18.4, "humidity": 60, "pressure": 1015},
        "weather": [{"description": "clear sky"}]
    })
}

#[tokio::test]
async fn test_current_weather_passes_body_through() {
    let mock = MockUpstream::new();
    mock.reply(endpoints().weather(), Reply::Json(milan_weather()));

    let result = invoke(&registry(&mock), "get_current_weather", city("Milan")).await;

    assert_eq!(result, ToolResult::success(milan_weather()));
    assert!(result.error().is_none());

    let calls = mock.calls_to(&endpoints().weather());
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        vec![
            ("q", "Milan".to_string()),
            ("APPID", API_KEY.to_string()),
            ("units", "metric".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_forecast_uses_forecast_endpoint() {
    let mock = MockUpstream::new();
    let body = json!({"city": {"name": "Milan"}, "list": [{"dt_txt": "2024-01-01 12:00:00"}]});
    mock.reply(endpoints().forecast(), Reply::Json(body.clone()));

    let result = invoke(&registry(&mock), "get_weather_forecast", city("Milan")).await;

    assert_eq!(result, ToolResult::success(body));
    let calls = mock.calls_to(&endpoints().forecast());
    assert_eq!(query_value(&calls[0], "APPID"), Some(API_KEY));
    assert_eq!(query_value(&calls[0], "units"), Some("metric"));
}

#[tokio::test]
async fn test_http_status_becomes_failure_with_subject_and_cause() {
    let mock = MockUpstream::new();
    mock.reply(endpoints().weather(), Reply::Status(404, "city not found"));

    let result = invoke(&registry(&mock), "get_current_weather", city("Nowhere")).await;

    assert_eq!(
        result,
        ToolResult::failure("Failed to get weather for Nowhere: HTTP 404: city not found")
    );
}

#[tokio::test]
async fn test_forecast_failure_uses_forecast_wording() {
    let mock = MockUpstream::new();
    mock.reply(endpoints().forecast(), Reply::Status(401, "Invalid API key"));

    let result = invoke(&registry(&mock), "get_weather_forecast", city("Milan")).await;

    assert_eq!(
        result.error(),
        Some("Failed to get forecast for Milan: HTTP 401: Invalid API key")
    );
}

#[tokio::test]
async fn test_transport_and_parse_faults_are_caught() {
    let mock = MockUpstream::new();
    mock.reply(endpoints().weather(), Reply::Transport)
        .reply(endpoints().weather(), Reply::BadJson);
    let registry = registry(&mock);

    let transport = invoke(&registry, "get_current_weather", city("Milan")).await;
    let message = transport.error().unwrap();
    assert!(message.starts_with("Failed to get weather for Milan: "), "{message}");

    let parse = invoke(&registry, "get_current_weather", city("Milan")).await;
    let message = parse.error().unwrap();
    assert!(
        message.starts_with("Failed to get weather for Milan: Invalid JSON response"),
        "{message}"
    );
}

#[tokio::test]
async fn test_air_pollution_empty_geocode_short_circuits() {
    let mock = MockUpstream::new();
    mock.reply(endpoints().geocode(), Reply::Json(json!([])));

    let result = invoke(&registry(&mock), "get_air_pollution", city("Atlantis")).await;

    assert_eq!(result.clone().into_value(), json!({"error": "City Atlantis not found"}));
    assert_eq!(mock.calls_to(&endpoints().geocode()).len(), 1);
    assert!(mock.calls_to(&endpoints().air_pollution()).is_empty());
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn test_air_pollution_uses_first_geocode_entry() {
    let mock = MockUpstream::new();
    let pollution = json!({"list": [{"main": {"aqi": 2}, "components": {"pm2_5": 7.1}}]});
    mock.reply(
        endpoints().geocode(),
        Reply::Json(json!([
            {"name": "Milan", "lat": 45.4642, "lon": 9.19, "country": "IT"},
            {"name": "Milan", "lat": 35.9, "lon": -88.76, "country": "US"}
        ])),
    )
    .reply(endpoints().air_pollution(), Reply::Json(pollution.clone()));

    let result = invoke(&registry(&mock), "get_air_pollution", city("Milan")).await;
    assert_eq!(result, ToolResult::success(pollution));

    let geocode = mock.calls_to(&endpoints().geocode());
    assert_eq!(
        geocode[0],
        vec![
            ("q", "Milan".to_string()),
            ("limit", "1".to_string()),
            ("appid", API_KEY.to_string()),
        ]
    );

    let calls = mock.calls_to(&endpoints().air_pollution());
    assert_eq!(calls.len(), 1);
    assert_eq!(query_value(&calls[0], "lat"), Some("45.4642"));
    assert_eq!(query_value(&calls[0], "lon"), Some("9.19"));
    assert_eq!(query_value(&calls[0], "appid"), Some(API_KEY));
    assert_eq!(query_value(&calls[0], "APPID"), None);
}

#[tokio::test]
async fn test_air_pollution_geocode_failure_is_reported() {
    let mock = MockUpstream::new();
    mock.reply(endpoints().geocode(), Reply::Status(500, "Internal error"));

    let result = invoke(&registry(&mock), "get_air_pollution", city("Milan")).await;

    assert_eq!(
        result.error(),
        Some("Failed to get air pollution for Milan: HTTP 500: Internal error")
    );
    assert!(mock.calls_to(&endpoints().air_pollution()).is_empty());
}

#[tokio::test]
async fn test_air_pollution_malformed_geocode_is_reported() {
    let mock = MockUpstream::new();
    mock.reply(endpoints().geocode(), Reply::Json(json!({"unexpected": true})));

    let result = invoke(&registry(&mock), "get_air_pollution", city("Milan")).await;

    let message = result.error().unwrap();
    assert!(message.starts_with("Failed to get air pollution for Milan: Invalid JSON response"));
    assert!(mock.calls_to(&endpoints().air_pollution()).is_empty());
}

#[tokio::test]
async fn test_missing_or_blank_city_never_reaches_upstream() {
    let mock = MockUpstream::new();
    let registry = registry(&mock);

    let missing = invoke(&registry, "get_current_weather", Map::new()).await;
    let message = missing.error().unwrap();
    assert!(
        message.starts_with("Invalid arguments for get_current_weather: missing field `city`"),
        "{message}"
    );

    let blank = invoke(&registry, "get_air_pollution", city("  ")).await;
    assert_eq!(
        blank.error(),
        Some("Invalid arguments for get_air_pollution: city must not be empty")
    );

    let mut wrong_type = Map::new();
    wrong_type.insert("city".to_string(), json!(42));
    let wrong = invoke(&registry, "get_weather_forecast", wrong_type).await;
    assert!(wrong.is_failure());

    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_repeated_invocations_are_identical() {
    let mock = MockUpstream::new();
    for _ in 0..3 {
        mock.reply(endpoints().weather(), Reply::Json(milan_weather()));
    }
    let registry = registry(&mock);

    let calls = (0..3).map(|_| invoke(&registry, "get_current_weather", city("Milan")));
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(|r| *r == ToolResult::success(milan_weather())));
    let queries = mock.calls_to(&endpoints().weather());
    assert_eq!(queries.len(), 3);
    assert!(queries.windows(2).all(|pair| pair[0] == pair[1]));
}
