//! The tool-calling chat loop
//!
//! One [`Orchestrator::chat`] call is one user turn. The turn first goes
//! through the heuristic pre-router; otherwise it runs the bounded
//! tool-calling loop: offer the catalog, execute whatever the model asks for
//! in order, then let the model word the final answer without tools.
//!
//! Everything that happens in a turn is persisted to the session as it
//! happens, so a model failure after tool execution leaves the partial
//! results in history.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::provider::{ChatMessage, ModelClient, ToolCall};
use crate::session::{SessionStore, DEFAULT_SESSION};
use crate::tools::ToolRegistry;

use super::prerouter::{classify, PreRoute};
use super::system_prompt::SystemPrompt;
use super::topic::extract_topic;

/// Default cap on tool rounds per turn
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 1;

/// One incoming user turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Conversation key; absent maps to the default session
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// The answer for one turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    /// Names of the tools the model itself invoked, in execution order.
    /// Heuristically seeded calls are not listed; the forced IT-contact
    /// path reports its single synthetic call.
    pub tool_calls: Vec<String>,
}

/// Drives the tool-calling conversation loop
pub struct Orchestrator {
    model: Arc<dyn ModelClient>,
    tools: ToolRegistry,
    sessions: SessionStore,
    system_prompt: String,
    max_tool_rounds: usize,
}

impl Orchestrator {
    pub fn new(model: Arc<dyn ModelClient>, tools: ToolRegistry) -> Self {
        Self {
            model,
            tools,
            sessions: SessionStore::default(),
            system_prompt: SystemPrompt::new().build(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Cap the number of tool rounds per turn
    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// History snapshot for a session
    pub fn history(&self, session_id: &str) -> Vec<ChatMessage> {
        self.sessions.history(session_id)
    }

    /// Handle one user turn
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let session_id = request
            .session_id
            .as_deref()
            .unwrap_or(DEFAULT_SESSION)
            .to_string();

        match classify(&request.message) {
            PreRoute::ForceItContact => self.forced_it_contact(&session_id, &request.message).await,
            route => {
                let seed = matches!(route, PreRoute::SeedContactLookup);
                self.run_loop(&session_id, &request.message, seed).await
            }
        }
    }

    /// Forced path: answer access requests with the IT contact up front
    ///
    /// The turn is a fixed script, one synthetic `get_it_contact` call and a
    /// single finalizing model call over the patched transcript. The session
    /// keeps the whole exchange so follow-ups see the contact details.
    async fn forced_it_contact(&self, session_id: &str, user_text: &str) -> Result<ChatResponse> {
        info!(session = session_id, "routing turn through forced IT-contact path");

        let call = ToolCall {
            id: Uuid::new_v4().to_string(),
            name: "get_it_contact".to_string(),
            arguments: json!({}),
        };
        let result = self.tools.dispatch(&call.name, &call.arguments).await;

        let user = ChatMessage::user(user_text);
        let assistant = ChatMessage::assistant_with_tools(None, vec![call.clone()]);
        let tool_msg = ChatMessage::tool_result(&call.id, &call.name, &result);

        let patched = vec![
            ChatMessage::system(&self.system_prompt),
            user.clone(),
            assistant.clone(),
            tool_msg.clone(),
        ];

        let defs = self.tools.list();
        let response = self.model.complete(&patched, Some(defs.as_slice())).await?;
        let answer = response.content.unwrap_or_default();

        self.sessions.with_session(session_id, |s| {
            s.push(user);
            s.push(assistant);
            s.push(tool_msg);
            s.push(ChatMessage::assistant(answer.clone()));
        });

        Ok(ChatResponse {
            answer,
            tool_calls: vec!["get_it_contact".to_string()],
        })
    }

    /// Seed a `lookup_contact` proposal and result for "who supports X"
    ///
    /// Best effort: any failure leaves the turn on the normal path.
    async fn seed_contact_lookup(&self, user_text: &str) -> Option<(ChatMessage, ChatMessage)> {
        let extraction = extract_topic(self.model.as_ref(), user_text).await?;
        debug!(topic = %extraction.topic, "seeding contact lookup");

        let call = ToolCall {
            id: Uuid::new_v4().to_string(),
            name: "lookup_contact".to_string(),
            arguments: json!({"area": extraction.topic}),
        };
        let result = self.tools.dispatch(&call.name, &call.arguments).await;

        let assistant = ChatMessage::assistant_with_tools(None, vec![call.clone()]);
        let tool_msg = ChatMessage::tool_result(&call.id, &call.name, &result);
        Some((assistant, tool_msg))
    }

    /// The main bounded tool-calling loop
    async fn run_loop(&self, session_id: &str, user_text: &str, seed: bool) -> Result<ChatResponse> {
        let mut outgoing = vec![ChatMessage::system(&self.system_prompt)];
        outgoing.extend(self.sessions.history(session_id));

        let user = ChatMessage::user(user_text);
        outgoing.push(user.clone());
        self.sessions.with_session(session_id, |s| s.push(user));

        if seed {
            if let Some((assistant, tool_msg)) = self.seed_contact_lookup(user_text).await {
                self.sessions.with_session(session_id, |s| {
                    s.push(assistant.clone());
                    s.push(tool_msg.clone());
                });
                outgoing.push(assistant);
                outgoing.push(tool_msg);
            }
        }

        let defs = self.tools.list();
        let mut invoked: Vec<String> = Vec::new();
        let mut rounds = 0usize;

        let answer = loop {
            let tools_for_round = if rounds < self.max_tool_rounds {
                Some(defs.as_slice())
            } else {
                None
            };

            let response = self.model.complete(&outgoing, tools_for_round).await?;

            let assistant = ChatMessage::assistant_with_tools(
                response.content.clone(),
                response.tool_calls.clone(),
            );
            self.sessions
                .with_session(session_id, |s| s.push(assistant.clone()));

            if response.tool_calls.is_empty() || tools_for_round.is_none() {
                if !response.tool_calls.is_empty() {
                    warn!(
                        session = session_id,
                        "model requested tools after the round cap, answering with content"
                    );
                }
                break response.content.unwrap_or_default();
            }

            outgoing.push(assistant);

            for call in &response.tool_calls {
                let result = self.tools.dispatch(&call.name, &call.arguments).await;
                let tool_msg = ChatMessage::tool_result(&call.id, &call.name, &result);
                self.sessions
                    .with_session(session_id, |s| s.push(tool_msg.clone()));
                outgoing.push(tool_msg);
                invoked.push(call.name.clone());
            }

            rounds += 1;
        };

        info!(
            session = session_id,
            tools = ?invoked,
            rounds,
            "turn complete"
        );

        Ok(ChatResponse {
            answer,
            tool_calls: invoked,
        })
    }
}
