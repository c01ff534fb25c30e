//! GenAI-backed model client
//!
//! Uses the genai framework so the assistant can run against any OpenAI-style
//! provider. Requests are executed with streaming and accumulated into a
//! single [`CompletionResult`], which avoids read timeouts on slow models.

use std::time::Duration;

use futures::StreamExt;
use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions, ChatRequest, ChatResponseFormat, ChatStreamEvent,
    JsonSpec, Tool as GenaiTool, ToolCall as GenaiToolCall, ToolResponse,
};
use genai::resolver::{AuthData, AuthResolver};
use genai::Client;
use genai::WebConfig;
use serde_json::Value;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::tools::ToolDefinition;

use super::{ChatMessage, ChatRole, CompletionResult, ModelClient, ToolCall};

/// A model client backed by the genai crate
pub struct GenAiClient {
    client: Client,
    model: String,
}

impl GenAiClient {
    /// Default timeout for model API requests
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    fn default_web_config() -> WebConfig {
        WebConfig::default()
            .with_timeout(Self::DEFAULT_TIMEOUT)
            .with_connect_timeout(Duration::from_secs(30))
    }

    /// Create a client that resolves credentials from the environment
    pub fn new(model: impl Into<String>) -> Self {
        let client = Client::builder()
            .with_web_config(Self::default_web_config())
            .build();
        Self {
            client,
            model: model.into(),
        }
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(model: impl Into<String>, api_key: &str) -> Self {
        let api_key = api_key.to_string();
        let auth_resolver = AuthResolver::from_resolver_fn(
            move |_model_iden| -> std::result::Result<Option<AuthData>, genai::resolver::Error> {
                Ok(Some(AuthData::from_single(api_key.clone())))
            },
        );

        let client = Client::builder()
            .with_web_config(Self::default_web_config())
            .with_auth_resolver(auth_resolver)
            .build();

        Self {
            client,
            model: model.into(),
        }
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Convert our message log into a genai request
    ///
    /// Assistant tool calls become a dedicated tool-call message and tool
    /// results go through `ToolResponse`, which keeps OpenAI-style providers
    /// happy about call/result pairing.
    fn build_request(messages: &[ChatMessage]) -> ChatRequest {
        let mut chat_req = ChatRequest::default();

        for msg in messages {
            match msg.role {
                ChatRole::System => {
                    chat_req = chat_req.append_message(GenaiMessage::system(msg.text()));
                }
                ChatRole::User => {
                    chat_req = chat_req.append_message(GenaiMessage::user(msg.text()));
                }
                ChatRole::Assistant => {
                    if msg.tool_calls.is_empty() {
                        chat_req = chat_req.append_message(GenaiMessage::assistant(msg.text()));
                    } else {
                        let genai_tool_calls: Vec<GenaiToolCall> = msg
                            .tool_calls
                            .iter()
                            .map(|tc| GenaiToolCall {
                                call_id: tc.id.clone(),
                                fn_name: tc.name.clone(),
                                fn_arguments: tc.arguments.clone(),
                                thought_signatures: None,
                            })
                            .collect();
                        chat_req = chat_req.append_message(genai_tool_calls);
                    }
                }
                ChatRole::Tool => {
                    if let Some(call_id) = &msg.tool_call_id {
                        let tool_response =
                            ToolResponse::new(call_id.clone(), msg.text().to_string());
                        chat_req = chat_req.append_message(tool_response);
                    }
                }
            }
        }

        chat_req
    }

    /// Execute a request with streaming and accumulate the events
    async fn exec(
        &self,
        chat_req: ChatRequest,
        options: Option<&ChatOptions>,
    ) -> Result<CompletionResult> {
        let stream_res = self
            .client
            .exec_chat_stream(&self.model, chat_req, options)
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, model = %self.model, "LLM request failed");
                Error::Provider(format!("GenAI error: {:?}", e))
            })?;

        let mut content = String::new();
        let mut tool_calls: Vec<ToolCall> = Vec::new();
        let mut stream = stream_res.stream;

        while let Some(event) = stream.next().await {
            match event {
                Ok(ChatStreamEvent::Chunk(chunk)) => {
                    content.push_str(&chunk.content);
                }
                Ok(ChatStreamEvent::ReasoningChunk(_)) => {
                    // Reasoning traces are not part of the answer
                }
                Ok(ChatStreamEvent::ToolCallChunk(tc)) => {
                    // Each ToolCallChunk carries a complete call
                    let tool_call = tc.tool_call;
                    tool_calls.push(ToolCall {
                        id: tool_call.call_id,
                        name: tool_call.fn_name,
                        arguments: tool_call.fn_arguments,
                    });
                }
                Ok(ChatStreamEvent::End(_)) => {
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = ?e, model = %self.model, "LLM stream error");
                    return Err(Error::Provider(format!("GenAI stream error: {:?}", e)));
                }
            }
        }

        Ok(CompletionResult {
            content: if content.is_empty() {
                None
            } else {
                Some(content)
            },
            tool_calls,
        })
    }
}

#[async_trait]
impl ModelClient for GenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<CompletionResult> {
        let mut chat_req = Self::build_request(messages);

        if let Some(tool_defs) = tools {
            let genai_tools: Vec<GenaiTool> = tool_defs
                .iter()
                .map(|t| {
                    GenaiTool::new(&t.name)
                        .with_description(&t.description)
                        .with_schema(t.parameters.clone())
                })
                .collect();
            chat_req = chat_req.with_tools(genai_tools);
        }

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.map(|t| t.len()).unwrap_or(0),
            "executing completion"
        );

        self.exec(chat_req, None).await
    }

    async fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema_name: &str,
        schema: Value,
    ) -> Result<Value> {
        let chat_req = Self::build_request(messages);
        let options = ChatOptions::default().with_response_format(ChatResponseFormat::JsonSpec(
            JsonSpec::new(schema_name.to_string(), schema),
        ));

        let result = self.exec(chat_req, Some(&options)).await?;
        let content = result.content.ok_or_else(|| {
            Error::Provider("structured completion returned no content".to_string())
        })?;

        serde_json::from_str(content.trim()).map_err(|e| {
            tracing::error!(error = %e, "structured completion was not valid JSON");
            Error::Provider(format!("invalid structured response: {}", e))
        })
    }
}
