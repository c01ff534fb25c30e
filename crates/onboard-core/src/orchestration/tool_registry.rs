//! Tool registry assembly
//!
//! Builds the full tool catalog over the shared stores. Policy and ticket
//! tools are store-free and always registered; the rest appear once their
//! store is provided.

use std::collections::HashMap;
use std::sync::Arc;

use crate::stores::{ContactsStore, DocStore, TaskStore};
use crate::tools::contacts::{GetCustomerInfo, GetItContact, LookupContact, SuggestSupport};
use crate::tools::docs::SearchDocs;
use crate::tools::policy::GetPolicy;
use crate::tools::tasks::{CheckTask, ListMyPending, ListPending};
use crate::tools::tickets::CreateItTicket;
use crate::tools::ToolRegistry;

/// Builder for the onboarding tool registry
#[derive(Default)]
pub struct ToolRegistryBuilder {
    docs: Option<Arc<DocStore>>,
    contacts: Option<Arc<ContactsStore>>,
    tasks: Option<Arc<TaskStore>>,
    policies: Option<HashMap<String, String>>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the document search tool
    pub fn with_docs(mut self, store: Arc<DocStore>) -> Self {
        self.docs = Some(store);
        self
    }

    /// Enable the contact directory tools
    pub fn with_contacts(mut self, store: Arc<ContactsStore>) -> Self {
        self.contacts = Some(store);
        self
    }

    /// Enable the task tools
    pub fn with_tasks(mut self, store: Arc<TaskStore>) -> Self {
        self.tasks = Some(store);
        self
    }

    /// Override the built-in policy table
    pub fn with_policies(mut self, policies: HashMap<String, String>) -> Self {
        self.policies = Some(policies);
        self
    }

    /// Build the registry with the configured stores
    pub fn build(self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();

        let policy = match self.policies {
            Some(policies) => GetPolicy::with_policies(policies),
            None => GetPolicy::new(),
        };
        registry.register(Arc::new(policy));
        registry.register(Arc::new(CreateItTicket));

        if let Some(docs) = self.docs {
            registry.register(Arc::new(SearchDocs::new(docs)));
        }

        if let Some(contacts) = self.contacts {
            registry.register(Arc::new(LookupContact::new(contacts.clone())));
            registry.register(Arc::new(GetCustomerInfo::new(contacts.clone())));
            registry.register(Arc::new(SuggestSupport::new(contacts.clone())));
            registry.register(Arc::new(GetItContact::new(contacts)));
        }

        if let Some(tasks) = self.tasks {
            registry.register(Arc::new(CheckTask::new(tasks.clone())));
            registry.register(Arc::new(ListPending::new(tasks.clone())));
            registry.register(Arc::new(ListMyPending::new(tasks)));
        }

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_catalog_has_ten_tools() {
        let registry = ToolRegistryBuilder::new()
            .with_docs(Arc::new(DocStore::default()))
            .with_contacts(Arc::new(ContactsStore::default()))
            .with_tasks(Arc::new(TaskStore::with_seed_tasks()))
            .build();

        let names = registry.names();
        assert_eq!(names.len(), 10);
        for name in [
            "get_policy",
            "create_it_ticket",
            "check_task",
            "search_docs",
            "lookup_contact",
            "get_customer_info",
            "suggest_support",
            "get_it_contact",
            "list_pending",
            "list_my_pending",
        ] {
            assert!(names.iter().any(|n| n == name), "missing tool {}", name);
        }
    }

    #[test]
    fn storeless_builder_keeps_static_tools() {
        let registry = ToolRegistryBuilder::new().build();
        assert!(registry.get("get_policy").is_some());
        assert!(registry.get("create_it_ticket").is_some());
        assert!(registry.get("search_docs").is_none());
        assert!(registry.get("lookup_contact").is_none());
    }
}
