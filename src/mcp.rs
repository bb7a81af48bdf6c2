//! MCP adapters: the server that exposes a [`ToolRegistry`], and a client-side
//! helper for driving it from another process.

use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, RawContent, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleClient, RoleServer, RunningService};
use rmcp::{ClientHandler, ErrorData, ServerHandler};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::tools::{ToolDefinition, ToolError, ToolInvocation, ToolRegistry, ToolResult};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("MCP error: {0}")]
    Mcp(String),
    #[error("Tool arguments must be a JSON object, got: {0}")]
    InvalidArguments(Value),
}

impl From<&ToolDefinition> for Tool {
    fn from(definition: &ToolDefinition) -> Self {
        let schema: JsonObject = match serde_json::to_value(&definition.parameters) {
            Ok(Value::Object(object)) => object,
            _ => JsonObject::new(),
        };
        Tool::new(
            definition.name.clone(),
            definition.description.clone(),
            Arc::new(schema),
        )
    }
}

impl From<ToolResult> for CallToolResult {
    fn from(result: ToolResult) -> Self {
        match result {
            ToolResult::Success(payload) => CallToolResult::structured(payload),
            ToolResult::Failure { error } => {
                CallToolResult::structured_error(json!({ "error": error }))
            }
        }
    }
}

/// Decode a tool reply back into a [`ToolResult`].
///
/// Structured content wins; otherwise the last text block that parses as JSON
/// is used, and plain text is wrapped as `{"response": [...]}`.
pub fn decode_call_result(result: CallToolResult) -> ToolResult {
    let is_error = result.is_error.unwrap_or(false);
    let mut parsed_text_content: Option<Value> = None;
    let mut raw_text_content: Vec<String> = Vec::new();

    for content in result.content {
        if let RawContent::Text(text_content) = content.raw {
            if let Ok(parsed) = serde_json::from_str::<Value>(&text_content.text) {
                parsed_text_content = Some(parsed);
            } else {
                raw_text_content.push(text_content.text);
            }
        }
    }

    let payload = result
        .structured_content
        .or(parsed_text_content)
        .unwrap_or_else(|| json!({ "response": raw_text_content }));

    if !is_error {
        return ToolResult::success(payload);
    }
    match payload.get("error").and_then(Value::as_str) {
        Some(message) => ToolResult::failure(message),
        None => ToolResult::failure(payload.to_string()),
    }
}

/// MCP server backed by a read-only [`ToolRegistry`].
#[derive(Debug, Clone)]
pub struct WeatherServer {
    registry: Arc<ToolRegistry>,
}

impl WeatherServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "weather".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Current weather, 5-day forecast and air pollution for a city, \
                 sourced from OpenWeatherMap."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools: Vec<Tool> = self.registry.list().map(Tool::from).collect();
        debug!("Listing {} tools", tools.len());
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let invocation =
            ToolInvocation::new(request.name.to_string(), request.arguments.unwrap_or_default());

        match self.registry.call(invocation).await {
            Ok(result) => Ok(result.into()),
            Err(err @ ToolError::NotFound(_)) => {
                warn!("{}", err);
                Err(ErrorData::invalid_params(err.to_string(), None))
            }
            Err(err) => Err(ErrorData::internal_error(err.to_string(), None)),
        }
    }
}

/// Client-side access to a running weather server.
#[async_trait]
pub trait WeatherToolsClient {
    /// List the tools the server advertises.
    async fn list_weather_tools(&self) -> Result<Vec<Tool>, SessionError>;

    /// Call a tool and decode its reply.
    async fn call_weather_tool(&self, name: &str, args: Value) -> Result<ToolResult, SessionError>;
}

#[async_trait]
impl<S: ClientHandler + Send + Sync> WeatherToolsClient for RunningService<RoleClient, S> {
    async fn list_weather_tools(&self) -> Result<Vec<Tool>, SessionError> {
        let result = self
            .deref()
            .list_tools(None)
            .await
            .map_err(|e| SessionError::Mcp(e.to_string()))?;
        Ok(result.tools)
    }

    async fn call_weather_tool(&self, name: &str, args: Value) -> Result<ToolResult, SessionError> {
        let arguments = match args {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => return Err(SessionError::InvalidArguments(other)),
        };
        let params = CallToolRequestParam {
            name: name.to_string().into(),
            arguments,
        };

        let result = self
            .deref()
            .call_tool(params)
            .await
            .map_err(|e| SessionError::Mcp(e.to_string()))?;

        Ok(decode_call_result(result))
    }
}
