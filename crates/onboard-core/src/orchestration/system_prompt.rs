//! System prompt management
//!
//! Single source of truth for the assistant's instructions, with optional
//! extra context appended by the host.

/// System prompt configuration and generation
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    /// Base system prompt
    base: String,
    /// Additional context (e.g., company specifics)
    context: Option<String>,
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPrompt {
    /// Create a new system prompt with the default content
    pub fn new() -> Self {
        Self {
            base: DEFAULT_SYSTEM_PROMPT.to_string(),
            context: None,
        }
    }

    /// Create with custom base prompt
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            context: None,
        }
    }

    /// Add custom context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Build the final system prompt
    pub fn build(&self) -> String {
        match &self.context {
            Some(ctx) => format!("{}\n\n{}", self.base, ctx),
            None => self.base.clone(),
        }
    }

    /// Get the base prompt without context
    pub fn base(&self) -> &str {
        &self.base
    }
}

/// Default instructions for the onboarding assistant
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an Employee Onboarding Assistant. \
Answer clearly, cite policy names if available, and call tools for factual data. \
If data is missing (e.g., email), ask a brief follow-up. \
For IT access/intake questions, FIRST provide the official IT contact channel \
(email + hotline) before asking for missing details. \
If the user asks about development setup/specifications/tasks, prefer search_docs first. \
For queries like 'pending tasks' or 'my pending tasks', call the appropriate tools \
and then present a concise summary (counts, overdue, due soon) before listing a few items. \
For 'who to contact' or 'who supports X', prefer lookup_contact(area=topic). \
For customer details, prefer get_customer_info(name/domain). \
Only then, if the user wants to proceed with a ticket, collect email/system.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_appended() {
        let prompt = SystemPrompt::new().with_context("Company: Corp");
        let built = prompt.build();
        assert!(built.starts_with(DEFAULT_SYSTEM_PROMPT));
        assert!(built.ends_with("Company: Corp"));
    }

    #[test]
    fn base_alone_has_no_trailing_context() {
        assert_eq!(SystemPrompt::new().build(), DEFAULT_SYSTEM_PROMPT);
    }
}
