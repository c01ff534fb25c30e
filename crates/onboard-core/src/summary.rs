//! Task digest
//!
//! Pure functions turning a task list into a structured summary and a
//! human-readable digest. `today` is always passed in so the bucketing is
//! deterministic under test.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::stores::Task;

/// A task due within this many days counts as due soon
pub const DUE_SOON_DAYS: i64 = 3;

/// Display fields of a task inside a summary
#[derive(Debug, Clone, Serialize)]
pub struct TaskBrief {
    pub id: String,
    pub title: String,
    pub assignee: String,
    pub owner: String,
    pub status: String,
    pub due_date: Option<String>,
    pub priority: String,
}

impl TaskBrief {
    fn of(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            assignee: task.assignee.clone(),
            owner: task.owner.clone(),
            status: task.status.as_str().to_string(),
            due_date: task.due_date.clone(),
            priority: task.priority.as_str().to_string(),
        }
    }
}

/// Structured summary of a task list
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub status_counts: BTreeMap<String, usize>,
    pub priority_counts: BTreeMap<String, usize>,
    /// Due strictly before today
    pub overdue: Vec<TaskBrief>,
    /// Due today through today + [`DUE_SOON_DAYS`]
    pub due_soon: Vec<TaskBrief>,
    /// Up to five tasks ordered by due date, undated last
    pub top_5: Vec<TaskBrief>,
}

/// Summarize a task list relative to `today`
///
/// Tasks with missing or unparseable due dates land in neither the overdue
/// nor the due-soon bucket, but still count toward the totals and may appear
/// in `top_5` (after every dated task).
pub fn summarize(tasks: &[&Task], today: NaiveDate) -> TaskSummary {
    let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut priority_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut overdue = Vec::new();
    let mut due_soon = Vec::new();

    for task in tasks.iter().copied() {
        *status_counts
            .entry(task.status.as_str().to_string())
            .or_default() += 1;
        *priority_counts
            .entry(task.priority.as_str().to_string())
            .or_default() += 1;

        if let Some(due) = task.due() {
            if due < today {
                overdue.push(TaskBrief::of(task));
            } else if (due - today).num_days() <= DUE_SOON_DAYS {
                due_soon.push(TaskBrief::of(task));
            }
        }
    }

    let mut by_due: Vec<&Task> = tasks.to_vec();
    by_due.sort_by_key(|t| t.due().unwrap_or(NaiveDate::MAX));
    let top_5 = by_due.into_iter().take(5).map(TaskBrief::of).collect();

    TaskSummary {
        total: tasks.len(),
        status_counts,
        priority_counts,
        overdue,
        due_soon,
        top_5,
    }
}

/// Render a summary as a markdown digest
///
/// Section order is fixed: total, status counts, priority counts, overdue,
/// due soon, next five. Empty sections are omitted entirely.
pub fn render(summary: &TaskSummary) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("- Open tasks: **{}**", summary.total));
    if !summary.status_counts.is_empty() {
        let sc = join_counts(&summary.status_counts);
        lines.push(format!("- By status: {}", sc));
    }
    if !summary.priority_counts.is_empty() {
        let pc = join_counts(&summary.priority_counts);
        lines.push(format!("- By priority: {}", pc));
    }

    if !summary.overdue.is_empty() {
        lines.push("\n**Overdue:**".to_string());
        for t in &summary.overdue {
            lines.push(format!(
                "  • {} - {} (assignee {}, due {})",
                t.id,
                t.title,
                t.assignee,
                t.due_date.as_deref().unwrap_or("?")
            ));
        }
    }

    if !summary.due_soon.is_empty() {
        lines.push(format!("\n**Due soon (≤{} days):**", DUE_SOON_DAYS));
        for t in &summary.due_soon {
            lines.push(format!(
                "  • {} - {} (due {})",
                t.id,
                t.title,
                t.due_date.as_deref().unwrap_or("?")
            ));
        }
    }

    if !summary.top_5.is_empty() {
        lines.push("\n**Next 5 by due date:**".to_string());
        for t in &summary.top_5 {
            lines.push(format!(
                "  • {} - {} ({}, due {})",
                t.id,
                t.title,
                t.status,
                t.due_date.as_deref().unwrap_or("?")
            ));
        }
    }

    lines.join("\n")
}

fn join_counts(counts: &BTreeMap<String, usize>) -> String {
    counts
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}
