//! Contact directory tools
//!
//! Four tools over the [`ContactsStore`]: people lookup, customer lookup,
//! support suggestion and the IT-contact shortcut the access-request path
//! relies on. None of them ever fail; empty or null results stand in for
//! "nothing found".

use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::ToolError;
use crate::stores::ContactsStore;

use super::{opt_str, BoxFuture, Tool};

/// `lookup_contact` — find people by role and/or expertise area
pub struct LookupContact {
    store: Arc<ContactsStore>,
}

impl LookupContact {
    pub fn new(store: Arc<ContactsStore>) -> Self {
        Self { store }
    }
}

impl Tool for LookupContact {
    fn name(&self) -> &str {
        "lookup_contact"
    }

    fn description(&self) -> &str {
        "Find people in the contact directory by role and/or expertise area"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "role": {"type": "string", "description": "Role substring, e.g. 'engineer'"},
                "area": {"type": "string", "description": "Expertise area, e.g. 'kubernetes'"}
            }
        })
    }

    fn execute(&self, params: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
        Box::pin(async move {
            let people = self
                .store
                .find_people(opt_str(&params, "role"), opt_str(&params, "area"));
            Ok(json!({"people": people}))
        })
    }
}

/// `get_customer_info` — customer account lookup by name or domain
pub struct GetCustomerInfo {
    store: Arc<ContactsStore>,
}

impl GetCustomerInfo {
    pub fn new(store: Arc<ContactsStore>) -> Self {
        Self { store }
    }
}

impl Tool for GetCustomerInfo {
    fn name(&self) -> &str {
        "get_customer_info"
    }

    fn description(&self) -> &str {
        "Look up a customer account by exact name or email domain"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "Customer name"},
                "domain": {"type": "string", "description": "Customer email domain"}
            }
        })
    }

    fn execute(&self, params: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
        Box::pin(async move {
            let customer = self
                .store
                .find_customer(opt_str(&params, "name"), opt_str(&params, "domain"));
            Ok(json!({"customer": customer}))
        })
    }
}

/// `suggest_support` — ranked support candidates for an issue or system
pub struct SuggestSupport {
    store: Arc<ContactsStore>,
}

impl SuggestSupport {
    pub fn new(store: Arc<ContactsStore>) -> Self {
        Self { store }
    }
}

impl Tool for SuggestSupport {
    fn name(&self) -> &str {
        "suggest_support"
    }

    fn description(&self) -> &str {
        "Suggest people who can help with an issue or system, helpdesk included"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "issue": {"type": "string", "description": "Free-text issue description"},
                "system": {"type": "string", "description": "Affected system name"}
            }
        })
    }

    fn execute(&self, params: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
        Box::pin(async move {
            let people = self
                .store
                .suggest_support(opt_str(&params, "issue"), opt_str(&params, "system"));
            Ok(json!({"people": people}))
        })
    }
}

/// `get_it_contact` — IT helpdesk contact, hotline preferred
pub struct GetItContact {
    store: Arc<ContactsStore>,
}

impl GetItContact {
    pub fn new(store: Arc<ContactsStore>) -> Self {
        Self { store }
    }
}

impl Tool for GetItContact {
    fn name(&self) -> &str {
        "get_it_contact"
    }

    fn description(&self) -> &str {
        "Return the IT helpdesk contact (email and hotline) from the contact directory"
    }

    fn parameters_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    fn execute(&self, _params: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
        Box::pin(async move {
            match self.store.it_contact() {
                Some(person) => Ok(json!({
                    "email": person.email,
                    "hotline": person.hotline,
                    "name": person.name,
                    "role": person.role,
                })),
                None => Ok(json!({"email": null, "hotline": null})),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::Person;

    fn store() -> Arc<ContactsStore> {
        Arc::new(ContactsStore::from_records(
            vec![
                Person {
                    name: "Lan Tran".to_string(),
                    role: "Backend Engineer".to_string(),
                    email: "lan@corp.vn".to_string(),
                    areas: vec!["kubernetes".to_string()],
                    ..Person::default()
                },
                Person {
                    name: "Minh Vu".to_string(),
                    role: "IT Helpdesk".to_string(),
                    email: "helpdesk@corp.vn".to_string(),
                    department: Some("IT".to_string()),
                    hotline: Some("+84 28 1234".to_string()),
                    ..Person::default()
                },
            ],
            Vec::new(),
        ))
    }

    #[tokio::test]
    async fn lookup_contact_filters_by_area() {
        let tool = LookupContact::new(store());
        let result = tool.execute(json!({"area": "kubernetes"})).await.unwrap();
        let people = result["people"].as_array().unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0]["name"], "Lan Tran");
    }

    #[tokio::test]
    async fn missing_customer_yields_null() {
        let tool = GetCustomerInfo::new(store());
        let result = tool.execute(json!({"name": "nobody"})).await.unwrap();
        assert!(result["customer"].is_null());
    }

    #[tokio::test]
    async fn it_contact_carries_hotline() {
        let tool = GetItContact::new(store());
        let result = tool.execute(json!({})).await.unwrap();
        assert_eq!(result["email"], "helpdesk@corp.vn");
        assert_eq!(result["hotline"], "+84 28 1234");
    }

    #[tokio::test]
    async fn empty_directory_yields_null_contact() {
        let tool = GetItContact::new(Arc::new(ContactsStore::default()));
        let result = tool.execute(json!({})).await.unwrap();
        assert!(result["email"].is_null());
        assert!(result["hotline"].is_null());
    }
}
