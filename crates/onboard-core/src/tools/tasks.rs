//! Onboarding task tools
//!
//! `check_task` looks up one task; the two `list_*` tools return the raw
//! tasks together with a structured summary and a pre-rendered digest, so the
//! model can either quote the digest or reason over the data.

use std::sync::Arc;

use chrono::Local;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::stores::{Task, TaskStore};
use crate::summary::{render, summarize};

use super::{req_str, BoxFuture, Tool};

fn digest_payload(tasks: Vec<&Task>) -> Value {
    let today = Local::now().date_naive();
    let summary = summarize(&tasks, today);
    let pretty = render(&summary);
    json!({"tasks": tasks, "summary": summary, "pretty": pretty})
}

/// `check_task` — status of one onboarding task by id
pub struct CheckTask {
    store: Arc<TaskStore>,
}

impl CheckTask {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }
}

impl Tool for CheckTask {
    fn name(&self) -> &str {
        "check_task"
    }

    fn description(&self) -> &str {
        "Check the status of one onboarding task by its id"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task_id": {"type": "string", "description": "Task id, e.g. NH-0001"}
            },
            "required": ["task_id"]
        })
    }

    fn execute(&self, params: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
        Box::pin(async move {
            let task_id = req_str(&params, "task_id")?;
            match self.store.get(task_id) {
                Some(task) => Ok(serde_json::to_value(task)
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?),
                None => Ok(json!({"status": "not_found"})),
            }
        })
    }
}

/// `list_pending` — every not-done task with summary and digest
pub struct ListPending {
    store: Arc<TaskStore>,
}

impl ListPending {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }
}

impl Tool for ListPending {
    fn name(&self) -> &str {
        "list_pending"
    }

    fn description(&self) -> &str {
        "List all onboarding tasks that are not done, with a summary digest"
    }

    fn parameters_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    fn execute(&self, _params: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
        Box::pin(async move { Ok(digest_payload(self.store.list_pending())) })
    }
}

/// `list_my_pending` — not-done tasks for one assignee
pub struct ListMyPending {
    store: Arc<TaskStore>,
}

impl ListMyPending {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }
}

impl Tool for ListMyPending {
    fn name(&self) -> &str {
        "list_my_pending"
    }

    fn description(&self) -> &str {
        "List not-done onboarding tasks for a specific assignee email"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "email": {"type": "string", "description": "Assignee email"}
            },
            "required": ["email"]
        })
    }

    fn execute(&self, params: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
        Box::pin(async move {
            let email = req_str(&params, "email")?;
            Ok(digest_payload(self.store.list_pending_by_user(email)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Arc<TaskStore> {
        Arc::new(TaskStore::with_seed_tasks())
    }

    #[tokio::test]
    async fn check_task_finds_seeded_task() {
        let tool = CheckTask::new(store());
        let result = tool.execute(json!({"task_id": "NH-0001"})).await.unwrap();
        assert_eq!(result["title"], "Submit I-9 / ID verification");
        assert_eq!(result["status"], "pending");
    }

    #[tokio::test]
    async fn check_task_unknown_id_is_not_found() {
        let tool = CheckTask::new(store());
        let result = tool.execute(json!({"task_id": "NH-9999"})).await.unwrap();
        assert_eq!(result["status"], "not_found");
    }

    #[tokio::test]
    async fn list_pending_carries_digest() {
        let tool = ListPending::new(store());
        let result = tool.execute(json!({})).await.unwrap();
        assert_eq!(result["tasks"].as_array().unwrap().len(), 3);
        assert_eq!(result["summary"]["total"], 3);
        assert!(result["pretty"].as_str().unwrap().contains("Open tasks"));
    }

    #[tokio::test]
    async fn list_my_pending_filters_by_assignee() {
        let tool = ListMyPending::new(store());
        let mine = tool
            .execute(json!({"email": "NEW.HIRE@corp.com"}))
            .await
            .unwrap();
        assert_eq!(mine["summary"]["total"], 3);

        let theirs = tool
            .execute(json!({"email": "someone.else@corp.com"}))
            .await
            .unwrap();
        assert_eq!(theirs["summary"]["total"], 0);
        assert!(theirs["tasks"].as_array().unwrap().is_empty());
    }
}
