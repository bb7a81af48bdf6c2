//! Tool registry: named, schema-described handlers built once at startup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::schema::RootSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Error type for registry operations.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool already registered: {0}")]
    Duplicate(String),

    #[error("Tool not found: {0}")]
    NotFound(String),
}

/// Static description of a tool, as advertised to callers.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema of the argument object.
    pub parameters: RootSchema,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: RootSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Build a definition whose parameters are the schema of `T`.
    pub fn for_args<T: schemars::JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(name, description, schemars::schema_for!(T))
    }

    /// Names of the required parameters, sorted.
    pub fn required_params(&self) -> Vec<&str> {
        self.parameters
            .schema
            .object
            .as_ref()
            .map(|obj| obj.required.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// A single request to run a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub arguments: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(tool_name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// Outcome of a tool call.
///
/// Serializes to the upstream payload itself on success, or to
/// `{"error": "..."}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolResult {
    Failure { error: String },
    Success(Value),
}

impl ToolResult {
    pub fn success(payload: Value) -> Self {
        ToolResult::Success(payload)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ToolResult::Failure {
            error: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ToolResult::Failure { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ToolResult::Failure { error } => Some(error),
            ToolResult::Success(_) => None,
        }
    }

    /// The JSON value a caller sees.
    pub fn into_value(self) -> Value {
        match self {
            ToolResult::Success(payload) => payload,
            ToolResult::Failure { error } => serde_json::json!({ "error": error }),
        }
    }
}

/// Executes one tool. Never fails: every error becomes [`ToolResult::Failure`].
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: Value) -> ToolResult;
}

struct RegisteredTool {
    definition: ToolDefinition,
    handler: Arc<dyn ToolHandler>,
}

/// Name-keyed tool table.
///
/// Populated at startup and read-only afterwards; share it behind an `Arc`.
/// Listing preserves registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. Fails if a tool with the same name already exists.
    pub fn register<H>(&mut self, definition: ToolDefinition, handler: H) -> Result<(), ToolError>
    where
        H: ToolHandler + 'static,
    {
        if self.by_name.contains_key(&definition.name) {
            return Err(ToolError::Duplicate(definition.name));
        }
        self.by_name
            .insert(definition.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            definition,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&dyn ToolHandler, ToolError> {
        self.by_name
            .get(name)
            .map(|&idx| self.tools[idx].handler.as_ref())
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// All definitions, in registration order.
    pub fn list(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter().map(|t| &t.definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up and run a tool. The only error is an unknown name.
    pub async fn call(&self, invocation: ToolInvocation) -> Result<ToolResult, ToolError> {
        let handler = self.lookup(&invocation.tool_name)?;
        info!("Tool call requested: {}", invocation.tool_name);

        let result = handler.call(Value::Object(invocation.arguments)).await;
        match &result {
            ToolResult::Success(_) => info!("Tool {} executed successfully", invocation.tool_name),
            ToolResult::Failure { error } => {
                warn!("Tool {} execution failed: {}", invocation.tool_name, error)
            }
        }
        Ok(result)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tools.iter().map(|t| &t.definition.name))
            .finish()
    }
}
