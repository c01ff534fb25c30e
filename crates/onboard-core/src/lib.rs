//! Onboard Core - Retrieval-augmented onboarding assistant
//!
//! This crate provides the core functionality for the onboarding copilot:
//! - Model provider abstraction (genai-backed client plus a test mock)
//! - Tool system over the onboarding data stores
//! - Heuristic pre-routing and the tool-calling orchestration loop
//! - Session-keyed bounded conversation state
//! - Task summarization

pub mod config;
pub mod error;
pub mod orchestration;
pub mod provider;
pub mod session;
pub mod stores;
pub mod summary;
pub mod tools;

pub use config::{ChatConfig, Config, ProviderConfig, StoresConfig};
pub use error::{Error, Result, ToolError};
pub use provider::{
    ChatMessage, ChatRole, CompletionResult, GenAiClient, MockModel, ModelClient, ToolCall,
};
pub use session::{ConversationState, SessionStore, DEFAULT_SESSION};
pub use stores::{ContactsStore, Customer, DocStore, Person, SearchHit, Task, TaskPriority,
    TaskStatus, TaskStore};
pub use summary::{render, summarize, TaskBrief, TaskSummary};
pub use tools::{Tool, ToolDefinition, ToolRegistry};

// Orchestration exports
pub use orchestration::{
    classify, ChatRequest, ChatResponse, Orchestrator, PreRoute, SystemPrompt,
    ToolRegistryBuilder, DEFAULT_SYSTEM_PROMPT,
};
