//! Orchestration layer
//!
//! Everything between a raw user message and a final answer: the heuristic
//! pre-router, the tool-calling loop, topic normalization, system prompt and
//! registry assembly.

mod chat_loop;
mod prerouter;
mod system_prompt;
mod tool_registry;
mod topic;

pub use chat_loop::{ChatRequest, ChatResponse, Orchestrator};
pub use prerouter::{classify, PreRoute};
pub use system_prompt::{SystemPrompt, DEFAULT_SYSTEM_PROMPT};
pub use tool_registry::ToolRegistryBuilder;
pub use topic::{extract_topic, TopicExtraction};
