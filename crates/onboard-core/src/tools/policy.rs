//! Company policy lookup tool

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::error::ToolError;

use super::{req_str, BoxFuture, Tool};

/// Sentinel returned when no policy covers the topic
pub const NO_POLICY: &str = "No policy found for this topic.";

/// `get_policy` — static topic-to-text lookup, case-insensitive
pub struct GetPolicy {
    policies: HashMap<String, String>,
}

impl Default for GetPolicy {
    fn default() -> Self {
        let mut policies = HashMap::new();
        policies.insert(
            "leave".to_string(),
            "New hires accrue 1.5 days/month. Submit on HR portal.".to_string(),
        );
        policies.insert(
            "it_access".to_string(),
            "Submit Access Request Form; manager approval needed.".to_string(),
        );
        policies.insert(
            "security".to_string(),
            "Complete Security 101 within 7 days.".to_string(),
        );
        Self { policies }
    }
}

impl GetPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policies(policies: HashMap<String, String>) -> Self {
        Self { policies }
    }
}

impl Tool for GetPolicy {
    fn name(&self) -> &str {
        "get_policy"
    }

    fn description(&self) -> &str {
        "Look up a company policy by topic (e.g. leave, it_access, security)"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {"type": "string", "description": "Policy topic to look up"}
            },
            "required": ["topic"]
        })
    }

    fn execute(&self, params: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
        Box::pin(async move {
            let topic = req_str(&params, "topic")?;
            let text = self
                .policies
                .get(&topic.to_lowercase())
                .map(String::as_str)
                .unwrap_or(NO_POLICY);
            Ok(json!({"topic": topic, "policy": text}))
        })
    }
}
