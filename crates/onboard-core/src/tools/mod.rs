//! Tool system for the onboarding assistant
//!
//! Tools are the actions the model can take. Each tool has:
//! - A name and description for the LLM
//! - A JSON schema for parameters
//! - An execute method
//!
//! Dispatch never raises toward the caller: unknown tools, bad arguments and
//! handler failures are all folded into a structured error value the model
//! can read and recover from in its final answer.

pub mod contacts;
pub mod docs;
pub mod policy;
pub mod tasks;
pub mod tickets;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::ToolError;

/// Boxed future type for object-safe async trait methods
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Tool definition for LLM consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Core trait for all tools
pub trait Tool: Send + Sync {
    /// Tool name (used by LLM to invoke)
    fn name(&self) -> &str;

    /// Description of what the tool does
    fn description(&self) -> &str;

    /// JSON schema for parameters
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with given parameters
    fn execute(&self, params: Value) -> BoxFuture<'_, Result<Value, ToolError>>;

    /// Convert to tool definition for LLM
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Registry of available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool definitions
    pub fn list(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.to_definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Execute a tool by name, folding every failure into the result value
    ///
    /// Arguments are validated against the tool's declared schema before the
    /// handler runs: every `required` property must be present and non-null.
    pub async fn dispatch(&self, name: &str, args: &Value) -> Value {
        let Some(tool) = self.get(name) else {
            warn!(tool = name, "model requested unknown tool");
            return json!({"error": "unknown tool"});
        };

        if let Err(detail) = validate_arguments(&tool.parameters_schema(), args) {
            warn!(tool = name, detail = %detail, "rejecting tool call arguments");
            return json!({"error": "invalid arguments", "detail": detail});
        }

        debug!(tool = name, "executing tool");
        match tool.execute(args.clone()).await {
            Ok(value) => value,
            Err(e) => {
                warn!(tool = name, error = %e, "tool execution failed");
                json!({"error": e.to_string()})
            }
        }
    }
}

/// Check `args` against a JSON schema's `required` list
fn validate_arguments(schema: &Value, args: &Value) -> Result<(), String> {
    let args_obj = match args {
        Value::Object(map) => Some(map),
        Value::Null => None,
        _ => return Err("arguments must be a JSON object".to_string()),
    };

    let required = schema
        .get("required")
        .and_then(|r| r.as_array())
        .cloned()
        .unwrap_or_default();

    for key in required.iter().filter_map(|k| k.as_str()) {
        let present = args_obj
            .and_then(|m| m.get(key))
            .map(|v| !v.is_null())
            .unwrap_or(false);
        if !present {
            return Err(format!("missing required argument: {}", key));
        }
    }
    Ok(())
}

/// Read an optional string argument, treating null as absent
pub(crate) fn opt_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

/// Read a required string argument
///
/// Dispatch has already checked presence for schema-required keys, so a miss
/// here means a non-string value.
pub(crate) fn req_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidArguments(format!("{} must be a string", key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echo the input back"
        }
        fn parameters_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            })
        }
        fn execute(&self, params: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
            Box::pin(async move { Ok(json!({"text": params["text"]})) })
        }
    }

    struct Failing;

    impl Tool for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
        fn execute(&self, _params: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
            Box::pin(async move { Err(ToolError::ExecutionFailed("boom".to_string())) })
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo));
        registry.register(Arc::new(Failing));
        registry
    }

    #[tokio::test]
    async fn unknown_tool_returns_error_value() {
        let result = registry().dispatch("nope", &json!({})).await;
        assert_eq!(result["error"], "unknown tool");
    }

    #[tokio::test]
    async fn missing_required_argument_is_rejected_before_execution() {
        let result = registry().dispatch("echo", &json!({})).await;
        assert_eq!(result["error"], "invalid arguments");
        assert!(result["detail"].as_str().unwrap().contains("text"));

        let null_arg = registry().dispatch("echo", &json!({"text": null})).await;
        assert_eq!(null_arg["error"], "invalid arguments");
    }

    #[tokio::test]
    async fn handler_error_is_folded_into_value() {
        let result = registry().dispatch("failing", &json!({})).await;
        assert!(result["error"].as_str().unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn valid_call_passes_through() {
        let result = registry().dispatch("echo", &json!({"text": "hi"})).await;
        assert_eq!(result["text"], "hi");
    }

    #[test]
    fn list_is_sorted_by_name() {
        let defs = registry().list();
        assert_eq!(defs[0].name, "echo");
        assert_eq!(defs[1].name, "failing");
    }
}
