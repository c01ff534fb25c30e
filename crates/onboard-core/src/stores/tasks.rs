//! Onboarding task store
//!
//! Ships with a built-in set of new-hire tasks and can additionally ingest a
//! markdown task file in the `- TASK:` block format used by the HR team.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Blocked,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Done => "done",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }

    /// Lenient parse; anything unrecognized counts as pending
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "in_progress" | "in progress" => TaskStatus::InProgress,
            "blocked" => TaskStatus::Blocked,
            "done" => TaskStatus::Done,
            _ => TaskStatus::Pending,
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => TaskPriority::Low,
            "high" => TaskPriority::High,
            _ => TaskPriority::Medium,
        }
    }
}

/// A single onboarding task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub owner: String,
    pub assignee: String,
    /// Due date as `YYYY-MM-DD`; other formats are kept verbatim but never
    /// land in a date-based bucket
    pub due_date: Option<String>,
    pub priority: TaskPriority,
    pub notes: String,
    pub tags: Vec<String>,
}

impl Task {
    /// Parsed due date, `None` when absent or unparseable
    pub fn due(&self) -> Option<NaiveDate> {
        self.due_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }
}

/// Task collection keyed by id
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: BTreeMap<String, Task>,
}

impl TaskStore {
    /// Store pre-populated with the standard new-hire checklist
    pub fn with_seed_tasks() -> Self {
        let mut store = Self::default();
        for task in seed_tasks() {
            store.tasks.insert(task.id.clone(), task);
        }
        store
    }

    /// Ingest a markdown task file in the `- TASK:` block format
    ///
    /// Each block gets a synthetic `EXT-NNNN` id in file order. A missing
    /// file is not an error, the built-in tasks simply stand alone.
    pub fn load_markdown(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no external task file");
            return Ok(());
        }
        let text = std::fs::read_to_string(path)?;

        let block_re = Regex::new(r"(?m)^\s*-\s*TASK:\s*").expect("valid task block regex");
        let blocks: Vec<&str> = block_re.split(&text).skip(1).collect();

        for (i, block) in blocks.iter().enumerate() {
            let chunk = format!("TASK: {}", block.trim());
            let field = |key: &str| -> String {
                Regex::new(&format!(r"(?m)^\s*{}:\s*(.+)$", key))
                    .ok()
                    .and_then(|re| re.captures(&chunk))
                    .map(|c| c[1].trim().to_string())
                    .unwrap_or_default()
            };

            let id = format!("EXT-{:04}", i + 1);
            let due = field("DUE");
            let task = Task {
                id: id.clone(),
                title: field("TASK"),
                status: TaskStatus::parse_lenient(&field("STATUS")),
                owner: field("OWNER"),
                assignee: field("ASSIGNEE"),
                due_date: if due.is_empty() { None } else { Some(due) },
                priority: TaskPriority::parse_lenient(&field("PRIORITY")),
                notes: field("REASONS"),
                tags: Vec::new(),
            };
            if task.title.is_empty() {
                warn!(id = %id, path = %path.display(), "skipping task block without title");
                continue;
            }
            self.tasks.insert(id, task);
        }

        debug!(total = self.tasks.len(), path = %path.display(), "external tasks loaded");
        Ok(())
    }

    pub fn insert(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    /// Look up a task by id
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// All tasks that are not done, in id order
    pub fn list_pending(&self) -> Vec<&Task> {
        self.tasks.values().filter(|t| !t.status.is_done()).collect()
    }

    /// Not-done tasks assigned to the given email, case-insensitive
    pub fn list_pending_by_user(&self, email: &str) -> Vec<&Task> {
        let email = email.trim().to_lowercase();
        self.tasks
            .values()
            .filter(|t| !t.status.is_done() && t.assignee.to_lowercase() == email)
            .collect()
    }
}

fn seed_tasks() -> Vec<Task> {
    vec![
        Task {
            id: "NH-0001".to_string(),
            title: "Submit I-9 / ID verification".to_string(),
            status: TaskStatus::Pending,
            owner: "hr.ops@corp.com".to_string(),
            assignee: "new.hire@corp.com".to_string(),
            due_date: Some("2025-10-25".to_string()),
            priority: TaskPriority::High,
            notes: "Bring passport to office or notary".to_string(),
            tags: vec!["onboarding".to_string(), "compliance".to_string()],
        },
        Task {
            id: "NH-0002".to_string(),
            title: "Request IT access (Email & VPN)".to_string(),
            status: TaskStatus::InProgress,
            owner: "it.helpdesk@corp.com".to_string(),
            assignee: "new.hire@corp.com".to_string(),
            due_date: Some("2025-10-20".to_string()),
            priority: TaskPriority::Medium,
            notes: "Waiting for manager approval".to_string(),
            tags: vec!["it_access".to_string()],
        },
        Task {
            id: "NH-0003".to_string(),
            title: "Complete Security 101".to_string(),
            status: TaskStatus::Pending,
            owner: "security.team@corp.com".to_string(),
            assignee: "new.hire@corp.com".to_string(),
            due_date: Some("2025-10-22".to_string()),
            priority: TaskPriority::Medium,
            notes: String::new(),
            tags: vec!["training".to_string(), "security".to_string()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn seed_tasks_are_present() {
        let store = TaskStore::with_seed_tasks();
        assert!(store.get("NH-0001").is_some());
        assert_eq!(store.get("NH-0002").unwrap().status, TaskStatus::InProgress);
        assert!(store.get("NH-9999").is_none());
    }

    #[test]
    fn pending_excludes_done() {
        let mut store = TaskStore::with_seed_tasks();
        store.insert(Task {
            id: "NH-0004".to_string(),
            title: "Pick up badge".to_string(),
            status: TaskStatus::Done,
            owner: "facilities@corp.com".to_string(),
            assignee: "new.hire@corp.com".to_string(),
            due_date: None,
            priority: TaskPriority::Low,
            notes: String::new(),
            tags: Vec::new(),
        });

        let pending = store.list_pending();
        assert_eq!(pending.len(), 3);
        assert!(pending.iter().all(|t| !t.status.is_done()));
    }

    #[test]
    fn pending_by_user_matches_case_insensitively() {
        let store = TaskStore::with_seed_tasks();
        let mine = store.list_pending_by_user("New.Hire@CORP.com");
        assert_eq!(mine.len(), 3);
        assert!(store.list_pending_by_user("someone.else@corp.com").is_empty());
    }

    #[test]
    fn loads_markdown_task_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pending-tasks.md");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "- TASK: Order laptop\n  OWNER: it.helpdesk@corp.com\n  ASSIGNEE: new.hire@corp.com\n  DUE: 2025-10-30\n  STATUS: pending\n  PRIORITY: high\n\n- TASK: Book orientation\n  ASSIGNEE: new.hire@corp.com"
        )
        .unwrap();

        let mut store = TaskStore::default();
        store.load_markdown(&path).unwrap();

        let first = store.get("EXT-0001").unwrap();
        assert_eq!(first.title, "Order laptop");
        assert_eq!(first.priority, TaskPriority::High);
        assert_eq!(first.due_date.as_deref(), Some("2025-10-30"));

        // Missing fields fall back to defaults
        let second = store.get("EXT-0002").unwrap();
        assert_eq!(second.status, TaskStatus::Pending);
        assert_eq!(second.priority, TaskPriority::Medium);
        assert!(second.due_date.is_none());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let mut store = TaskStore::default();
        assert!(store.load_markdown("/nonexistent/tasks.md").is_ok());
    }

    #[test]
    fn unparseable_due_date_is_none() {
        let task = Task {
            id: "T".to_string(),
            title: "t".to_string(),
            status: TaskStatus::Pending,
            owner: String::new(),
            assignee: String::new(),
            due_date: Some("soon".to_string()),
            priority: TaskPriority::Low,
            notes: String::new(),
            tags: Vec::new(),
        };
        assert!(task.due().is_none());
    }
}
