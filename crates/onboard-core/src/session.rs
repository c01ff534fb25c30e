//! Conversation state
//!
//! Bounded per-session message logs. The store is explicitly injected into
//! the orchestrator rather than living as process-global state, so parallel
//! sessions and tests stay isolated.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

use crate::provider::ChatMessage;

/// Session key used when a request carries none
pub const DEFAULT_SESSION: &str = "default";

/// Default sliding-window size
pub const DEFAULT_MAX_MESSAGES: usize = 30;

/// One conversation's ordered, bounded message log
#[derive(Debug)]
pub struct ConversationState {
    messages: VecDeque<ChatMessage>,
    max_messages: usize,
}

impl ConversationState {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            max_messages: max_messages.max(1),
        }
    }

    /// Append a message, dropping the oldest when the window is full
    pub fn push(&mut self, message: ChatMessage) {
        if self.messages.len() == self.max_messages {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Snapshot of the log, oldest first
    pub fn history(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Session-keyed conversation store
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, ConversationState>>,
    max_messages: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES)
    }
}

impl SessionStore {
    pub fn new(max_messages: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_messages,
        }
    }

    /// Run a closure against one session's state, creating it on first use
    pub fn with_session<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut ConversationState) -> R,
    ) -> R {
        let mut sessions = self.sessions.lock();
        let state = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ConversationState::new(self.max_messages));
        f(state)
    }

    /// Snapshot of one session's history; empty for unknown sessions
    pub fn history(&self, session_id: &str) -> Vec<ChatMessage> {
        self.sessions
            .lock()
            .get(session_id)
            .map(|s| s.history())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_drops_oldest() {
        let mut state = ConversationState::new(3);
        for i in 0..5 {
            state.push(ChatMessage::user(format!("m{}", i)));
        }
        let history = state.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].text(), "m2");
        assert_eq!(history[2].text(), "m4");
    }

    #[test]
    fn sessions_are_isolated() {
        let store = SessionStore::new(10);
        store.with_session("a", |s| s.push(ChatMessage::user("hello from a")));
        store.with_session("b", |s| s.push(ChatMessage::user("hello from b")));

        assert_eq!(store.history("a").len(), 1);
        assert_eq!(store.history("a")[0].text(), "hello from a");
        assert_eq!(store.history("b")[0].text(), "hello from b");
        assert!(store.history("missing").is_empty());
    }
}
