//! IT ticket creation tool

use serde_json::{json, Value};

use crate::error::ToolError;

use super::{req_str, BoxFuture, Tool};

/// `create_it_ticket` — simulated access-request ticket
///
/// The ticket id is derived deterministically from the requester's email so
/// repeated requests are easy to spot in the transcript.
pub struct CreateItTicket;

impl Tool for CreateItTicket {
    fn name(&self) -> &str {
        "create_it_ticket"
    }

    fn description(&self) -> &str {
        "Open an IT access-request ticket for a system on behalf of an employee"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "email": {"type": "string", "description": "Requester's corporate email"},
                "system": {"type": "string", "description": "System access is requested for"},
                "justification": {"type": "string", "description": "Why access is needed"}
            },
            "required": ["email", "system"]
        })
    }

    fn execute(&self, params: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
        Box::pin(async move {
            let email = req_str(&params, "email")?;
            let system = req_str(&params, "system")?;

            let local = email.split('@').next().unwrap_or(email);
            Ok(json!({
                "ticket_id": format!("IT-{}", local.to_uppercase()),
                "system": system,
                "status": "OPEN"
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ticket_id_comes_from_email_local_part() {
        let tool = CreateItTicket;
        let result = tool
            .execute(json!({"email": "new.hire@corp.com", "system": "vpn"}))
            .await
            .unwrap();
        assert_eq!(result["ticket_id"], "IT-NEW.HIRE");
        assert_eq!(result["system"], "vpn");
        assert_eq!(result["status"], "OPEN");
    }

    #[tokio::test]
    async fn justification_is_optional() {
        let tool = CreateItTicket;
        let result = tool
            .execute(json!({
                "email": "a@corp.com",
                "system": "jira",
                "justification": "sprint planning"
            }))
            .await
            .unwrap();
        assert_eq!(result["ticket_id"], "IT-A");
    }
}
