//! Model provider abstraction
//!
//! The orchestration loop talks to the language model through the
//! [`ModelClient`] trait: one completion entry point that may return text,
//! tool calls, or both, plus a structured-extraction variant used by the
//! topic normalizer. The genai-backed implementation lives in
//! [`genai_client`]; [`MockModel`] is a scriptable stand-in for tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::tools::ToolDefinition;

mod genai_client;

pub use genai_client::GenAiClient;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions for the model
    System,
    /// End-user input
    User,
    /// Model output (text and/or tool calls)
    Assistant,
    /// Result of a tool execution
    Tool,
}

/// A tool invocation requested by the model
///
/// Ids are opaque and only unique within a single orchestration round;
/// they are never reused across rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// A single message in a conversation
///
/// Invariant: a tool message's `tool_call_id` must reference a call emitted
/// by the immediately preceding assistant message of the same round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    /// Text content; assistant messages that only carry tool calls have none
    pub content: Option<String>,
    /// Tool calls made by this message (assistant messages only)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tool_calls: Vec<ToolCall>,
    /// Id of the tool call this message answers (tool messages only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_call_id: Option<String>,
    /// Name of the tool that produced this message (tool messages only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a plain assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Create an assistant message that may carry tool calls
    pub fn assistant_with_tools(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a tool result message answering the given call
    ///
    /// The structured result is serialized into the message content so it can
    /// be parsed back losslessly.
    pub fn tool_result(tool_call_id: &str, tool_name: &str, result: &Value) -> Self {
        Self {
            role: ChatRole::Tool,
            content: Some(result.to_string()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.to_string()),
            name: Some(tool_name.to_string()),
        }
    }

    /// Text content, empty string when absent
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// Response from a completion that may contain both content and tool calls
#[derive(Debug, Clone, Default)]
pub struct CompletionResult {
    /// Text content from the assistant (may be present even with tool calls)
    pub content: Option<String>,
    /// Tool calls the model wants executed, in emission order
    pub tool_calls: Vec<ToolCall>,
}

impl CompletionResult {
    /// Result carrying only text
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Result carrying only tool calls
    pub fn calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: None,
            tool_calls,
        }
    }

    /// Check if this result has any tool calls
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Trait for model providers
///
/// A failed call is an `Error::Provider`; the orchestration loop treats that
/// as fatal for the current turn, while best-effort callers (the seeding
/// heuristic) swallow it.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// One completion round; `tools` is the catalog offered for tool choice
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<CompletionResult>;

    /// Structured extraction: the model must answer with JSON matching `schema`
    async fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema_name: &str,
        schema: Value,
    ) -> Result<Value>;
}

/// Scriptable model for tests and offline runs
///
/// Completions and structured replies are served in FIFO order; an exhausted
/// queue turns into a provider error, which is also how collaborator failure
/// paths are exercised.
#[derive(Default)]
pub struct MockModel {
    completions: Mutex<VecDeque<CompletionResult>>,
    structured: Mutex<VecDeque<std::result::Result<Value, String>>>,
    /// Every message list passed to `complete`, for assertions
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a completion reply
    pub fn push_completion(&self, result: CompletionResult) {
        self.completions.lock().push_back(result);
    }

    /// Queue a structured-extraction reply
    pub fn push_structured(&self, result: std::result::Result<Value, String>) {
        self.structured.lock().push_back(result);
    }

    /// Message lists received by `complete`, in call order
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ModelClient for MockModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _tools: Option<&[ToolDefinition]>,
    ) -> Result<CompletionResult> {
        self.requests.lock().push(messages.to_vec());
        self.completions
            .lock()
            .pop_front()
            .ok_or_else(|| Error::Provider("mock model has no scripted completion".to_string()))
    }

    async fn complete_structured(
        &self,
        _messages: &[ChatMessage],
        _schema_name: &str,
        _schema: Value,
    ) -> Result<Value> {
        match self.structured.lock().pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(Error::Provider(message)),
            None => Err(Error::Provider(
                "mock model has no scripted structured reply".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_roles_serialize_lowercase() {
        let msg = ChatMessage::user("Hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "Hello");
        assert!(json.get("tool_calls").is_none());
    }

    #[test]
    fn tool_result_round_trips() {
        let result = json!({"ticket_id": "IT-NEW.HIRE", "system": "vpn", "status": "OPEN"});
        let msg = ChatMessage::tool_result("call-1", "create_it_ticket", &result);

        let parsed: Value = serde_json::from_str(msg.text()).unwrap();
        assert_eq!(parsed, result);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call-1"));
        assert_eq!(msg.name.as_deref(), Some("create_it_ticket"));
    }

    #[test]
    fn assistant_tool_calls_survive_serde() {
        let call = ToolCall {
            id: "c1".into(),
            name: "get_policy".into(),
            arguments: json!({"topic": "leave"}),
        };
        let msg = ChatMessage::assistant_with_tools(None, vec![call.clone()]);

        let text = serde_json::to_string(&msg).unwrap();
        let back: ChatMessage = serde_json::from_str(&text).unwrap();
        assert_eq!(back.tool_calls, vec![call]);
        assert!(back.content.is_none());
    }

    #[tokio::test]
    async fn mock_serves_replies_in_order() {
        let mock = MockModel::new();
        mock.push_completion(CompletionResult::text("first"));
        mock.push_completion(CompletionResult::text("second"));

        let first = mock.complete(&[], None).await.unwrap();
        let second = mock.complete(&[], None).await.unwrap();
        assert_eq!(first.content.as_deref(), Some("first"));
        assert_eq!(second.content.as_deref(), Some("second"));

        let exhausted = mock.complete(&[], None).await;
        assert!(matches!(exhausted, Err(Error::Provider(_))));
    }
}
