//! Document search tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::ToolError;
use crate::stores::DocStore;

use super::{req_str, BoxFuture, Tool};

const DEFAULT_TOP_K: usize = 5;

/// `search_docs` — keyword search over the onboarding document tree
pub struct SearchDocs {
    store: Arc<DocStore>,
}

impl SearchDocs {
    pub fn new(store: Arc<DocStore>) -> Self {
        Self { store }
    }
}

impl Tool for SearchDocs {
    fn name(&self) -> &str {
        "search_docs"
    }

    fn description(&self) -> &str {
        "Search the internal onboarding documents and return the best matching passages"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Keywords to search for"},
                "top_k": {"type": "integer", "description": "Maximum number of results", "default": DEFAULT_TOP_K}
            },
            "required": ["query"]
        })
    }

    fn execute(&self, params: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
        Box::pin(async move {
            let query = req_str(&params, "query")?;
            if query.trim().is_empty() {
                return Ok(json!({"results": []}));
            }

            let top_k = params
                .get("top_k")
                .and_then(|v| v.as_u64())
                .map(|v| v as usize)
                .unwrap_or(DEFAULT_TOP_K);

            let hits = self.store.search(query, top_k);
            Ok(json!({"results": hits}))
        })
    }
}
